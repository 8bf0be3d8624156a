mod common;

use std::io::{Cursor, Write};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use zip::write::FileOptions;

use common::{admin_auth, empty_request, send, spawn_app, TestApp};

const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const BOUNDARY: &str = "----assessment-boundary";

const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

fn presentation(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn upload_request(field: &str, content_type: &str, data: &[u8], auth: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"deck.pptx\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload/ppt")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

fn dir_entries(app: &TestApp, sub: &str) -> usize {
    std::fs::read_dir(app.uploads.path().join(sub))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn upload_extracts_images_into_a_set() {
    let app = spawn_app().await;
    let archive = presentation(&[
        ("ppt/slides/slide1.xml", b"<p:sld/>"),
        ("ppt/media/image2.png", PNG),
        ("ppt/media/image1.jpeg", JPEG),
        ("ppt/media/readme.txt", b"plain text"),
    ]);

    let (status, body) = send(
        &app.router,
        upload_request("ppt", PPTX_MIME, &archive, Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let images: Vec<String> = body["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(images.len(), 2);
    assert!(images[0].ends_with(".jpg"));
    assert!(images[1].ends_with(".png"));
    assert_eq!(dir_entries(&app, "images"), 2);
    assert_eq!(dir_entries(&app, "tmp"), 0);

    let (status, served) = {
        let response = tower::ServiceExt::oneshot(
            app.router.clone(),
            empty_request("GET", &images[1], None),
        )
        .await
        .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    };
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&served[..], PNG);

    let (status, random) = send(&app.router, empty_request("GET", "/api/tat/random-set", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(random["set_id"], body["set_id"]);
    assert_eq!(random["images"].as_array().unwrap().len(), 2);

    let (_, tat) = send(&app.router, empty_request("GET", "/api/tat", None)).await;
    assert_eq!(tat.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn random_set_is_not_found_before_any_upload() {
    let app = spawn_app().await;
    let (status, _) = send(&app.router, empty_request("GET", "/api/tat/random-set", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_presentation_mime_is_rejected_before_extraction() {
    let app = spawn_app().await;
    let archive = presentation(&[("ppt/media/image1.png", PNG)]);

    let (status, _) = send(
        &app.router,
        upload_request("ppt", "image/png", &archive, Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.uploads.path().join("tmp").exists());
    assert_eq!(dir_entries(&app, "images"), 0);
}

#[tokio::test]
async fn malformed_archive_leaves_nothing_behind() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app.router,
        upload_request("ppt", PPTX_MIME, b"PK\x03\x04 truncated", Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(dir_entries(&app, "images"), 0);
    assert_eq!(dir_entries(&app, "tmp"), 0);

    let (status, _) = send(&app.router, empty_request("GET", "/api/tat/sets", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn presentation_without_images_is_rejected() {
    let app = spawn_app().await;
    let archive = presentation(&[("ppt/slides/slide1.xml", b"<p:sld/>")]);

    let (status, body) = send(
        &app.router,
        upload_request("ppt", PPTX_MIME, &archive, Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No images found in the PowerPoint file");

    let (_, sets) = send(&app.router, empty_request("GET", "/api/tat/sets", None)).await;
    assert!(sets.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upload_requires_admin_and_the_ppt_field() {
    let app = spawn_app().await;
    let archive = presentation(&[("ppt/media/image1.png", PNG)]);

    let (status, _) = send(&app.router, upload_request("ppt", PPTX_MIME, &archive, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app.router,
        upload_request("file", PPTX_MIME, &archive, Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = spawn_app().await;
    let oversized = vec![0u8; assessment_backend::config::DEFAULT_MAX_UPLOAD_BYTES + 1];

    let (status, body) = send(
        &app.router,
        upload_request("ppt", PPTX_MIME, &oversized, Some(&admin_auth())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File size too large. Maximum size is 10MB.");
    assert!(!app.uploads.path().join("tmp").exists());
}
