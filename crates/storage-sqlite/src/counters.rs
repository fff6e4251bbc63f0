//! Persistent high-water counters shared by the repositories.

use diesel::prelude::*;
use diesel::SqliteConnection;

use paragliding_core::Result;

use crate::errors::IntoCore;
use crate::schema::counters;

pub const TRACKS_ISSUED: &str = "tracks_issued";
pub const LAST_TOKEN: &str = "last_token";
pub const WEBHOOKS_ISSUED: &str = "webhooks_issued";

pub fn read(conn: &mut SqliteConnection, name: &str) -> Result<Option<i64>> {
    counters::table
        .find(name)
        .select(counters::value)
        .first::<i64>(conn)
        .optional()
        .into_core()
}

pub fn write(conn: &mut SqliteConnection, name: &str, value: i64) -> Result<()> {
    diesel::insert_into(counters::table)
        .values((counters::name.eq(name), counters::value.eq(value)))
        .on_conflict(counters::name)
        .do_update()
        .set(counters::value.eq(value))
        .execute(conn)
        .into_core()?;
    Ok(())
}
