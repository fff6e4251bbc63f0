mod common;

use axum::http::{Method, StatusCode};
use common::{Fixtures, TestApp};
use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread")]
async fn ingest_and_read_back_tracks() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::sqlite().await;

    let (_, empty) = app.get_json("/paragliding/api/track").await;
    assert_eq!(empty, json!([]));

    for (n, pilot) in ["alice", "bruno", "chen"].iter().enumerate() {
        let id = app.ingest(&fixtures.file_url(&format!("{}.igc", pilot))).await;
        assert_eq!(id, format!("igc{}", n + 1));
    }

    let (status, ids) = app.get_json("/paragliding/api/track").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids, json!(["igc1", "igc2", "igc3"]));

    let (status, track) = app.get_json("/paragliding/api/track/igc2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(track["pilot"], "bruno");
    assert_eq!(track["glider"], "Ozone Enzo 3");
    assert_eq!(track["glider_id"], "D-1234");
    assert_eq!(track["H_date"], "2018-05-02");
    assert_eq!(track["track_src_url"], fixtures.file_url("bruno.igc").as_str());
    assert!(track["track_length"].as_f64().unwrap() > 0.0);

    let (status, pilot) = app.get_text("/paragliding/api/track/igc3/pilot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pilot, "chen");
    let (_, date) = app.get_text("/paragliding/api/track/igc3/H_date").await;
    assert_eq!(date, "2018-05-02");
}

#[tokio::test(flavor = "multi_thread")]
async fn ingest_accepts_url_object() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::memory().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/paragliding/api/track",
            Some(json!({ "url": fixtures.file_url("dana.igc") })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<String>(&body).unwrap(), "igc1");
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_ingestions_are_client_errors() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::memory().await;

    let bad_bodies = [
        json!(""),
        json!(42),
        json!({ "link": "x" }),
        Value::from("ftp://tracks.test/a.igc"),
        Value::from(fixtures.file_url("missing.igc")),
        Value::from(fixtures.file_url("not-a-log.txt")),
    ];
    for body in bad_bodies {
        let (status, _) = app
            .request(Method::POST, "/paragliding/api/track", Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }

    let (status, _) = app
        .request(Method::POST, "/paragliding/api/track", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Failed ingestions never consume an id.
    let id = app.ingest(&fixtures.file_url("erin.igc")).await;
    assert_eq!(id, "igc1");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_tracks_and_fields() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::sqlite().await;
    app.ingest(&fixtures.file_url("alice.igc")).await;

    for uri in [
        "/paragliding/api/track/igc2",
        "/paragliding/api/track/igc0",
        "/paragliding/api/track/track1",
        "/paragliding/api/track/igc2/pilot",
    ] {
        let (status, _) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let (status, body) = app.get_json("/paragliding/api/track/igc1/wingspan").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test(flavor = "multi_thread")]
async fn ticker_pages_through_tracks() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::sqlite().await;

    let (status, _) = app.get_text("/paragliding/api/ticker/latest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get_json("/paragliding/api/ticker").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for n in 0..7 {
        app.ingest(&fixtures.file_url(&format!("pilot{}.igc", n))).await;
    }

    let (status, latest) = app.get_text("/paragliding/api/ticker/latest").await;
    assert_eq!(status, StatusCode::OK);
    let latest: u64 = latest.parse().unwrap();

    let (status, first) = app.get_json("/paragliding/api/ticker").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["tracks"], json!(["igc1", "igc2", "igc3", "igc4", "igc5"]));
    assert_eq!(first["t_latest"], latest);

    let t_stop = first["t_stop"].as_u64().unwrap();
    let (status, second) = app
        .get_json(&format!("/paragliding/api/ticker/{}", t_stop))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["tracks"], json!(["igc6", "igc7"]));
    assert_eq!(second["t_stop"], latest);

    let (_, again) = app
        .get_json(&format!("/paragliding/api/ticker/{}", t_stop))
        .await;
    assert_eq!(again["tracks"], second["tracks"]);

    let (status, tail) = app
        .get_json(&format!("/paragliding/api/ticker/{}", latest))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tail["tracks"], json!([]));

    for cursor in ["abc", "0"] {
        let (status, _) = app
            .get_json(&format!("/paragliding/api/ticker/{}", cursor))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", cursor);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_counts_and_wipes_tracks() {
    let fixtures = Fixtures::start().await;
    let app = TestApp::sqlite().await;
    for pilot in ["alice", "bruno"] {
        app.ingest(&fixtures.file_url(&format!("{}.igc", pilot))).await;
    }

    let (_, count) = app.get_text("/admin/api/tracks_count").await;
    assert_eq!(count, "2");

    let (status, wiped) = app.request(Method::DELETE, "/admin/api/tracks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wiped, b"2");

    let (_, count) = app.get_text("/admin/api/tracks_count").await;
    assert_eq!(count, "0");
    let (_, ids) = app.get_json("/paragliding/api/track").await;
    assert_eq!(ids, json!([]));

    // Numbering continues after a wipe.
    let id = app.ingest(&fixtures.file_url("chen.igc")).await;
    assert_eq!(id, "igc3");
    let (_, ids) = app.get_json("/paragliding/api/track").await;
    assert_eq!(ids, json!(["igc3"]));
}
