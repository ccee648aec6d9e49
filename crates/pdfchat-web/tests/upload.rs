use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

const BOUNDARY: &str = "pdfchat-test-boundary";

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload_pdf/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upload_echoes_filename() {
    let app = pdfchat_web::router(1024 * 1024);
    let body = multipart_body(&[("file", Some("report.pdf"), b"%PDF-1.4 fake")]);

    let resp = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        serde_json::json!({"filename": "report.pdf"})
    );
}

#[tokio::test]
async fn extra_fields_are_ignored() {
    let app = pdfchat_web::router(1024 * 1024);
    let body = multipart_body(&[
        ("note", None, b"hello"),
        ("file", Some("slides.pdf"), b"%PDF-1.7"),
    ]);

    let resp = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["filename"], "slides.pdf");
}

#[tokio::test]
async fn missing_file_field_is_unprocessable() {
    let app = pdfchat_web::router(1024 * 1024);
    let body = multipart_body(&[("note", None, b"hello")]);

    let resp = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["detail"], "No file uploaded");
}

#[tokio::test]
async fn non_multipart_request_is_unprocessable() {
    let app = pdfchat_web::router(1024 * 1024);
    let req = Request::builder()
        .method("POST")
        .uri("/upload_pdf/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn truncated_body_is_server_error() {
    let app = pdfchat_web::router(1024 * 1024);
    let mut body = multipart_body(&[("file", Some("report.pdf"), b"%PDF-1.4")]);
    // Drop the closing boundary so the stream ends mid-form.
    body.truncate(body.len() - BOUNDARY.len() - 6);

    let resp = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await["detail"], "Upload failed");
}

#[tokio::test]
async fn oversized_upload_is_server_error() {
    let app = pdfchat_web::router(16);
    let body = multipart_body(&[("file", Some("big.pdf"), &[b'x'; 4096])]);

    let resp = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn other_routes_are_not_found() {
    let app = pdfchat_web::router(1024);
    let req = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
