mod helpers;

use docview_core::constants::{preview_url_key, signed_url_key};
use docview_core::{pdf_page_width, DocviewError, PreviewFileType, ZoomLevel};
use docview_preview::{
    CancellationToken, FallbackReason, ImageSource, MediaKind, PreviewContent, PreviewOptions,
};
use helpers::fixtures::{document, document_with_markdown, signed_storage_url, PNG_PIXEL};
use helpers::{dispatcher, TOKEN};
use mockito::Matcher;
use serde_json::json;

fn options() -> PreviewOptions {
    PreviewOptions::new(1280, ZoomLevel::default())
}

fn assert_fallback(content: &PreviewContent, reason: FallbackReason, document_id: &str) {
    match content {
        PreviewContent::Fallback(panel) => {
            assert_eq!(panel.reason, reason);
            assert_eq!(panel.download.document_id, document_id);
            assert_eq!(
                panel.download.path,
                format!("/api/documents/{}/download", document_id)
            );
        }
        other => panic!("expected {:?} fallback, got {:?}", reason, other),
    }
}

async fn mock_view_url(
    server: &mut mockito::ServerGuard,
    id: &str,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", format!("/api/documents/{}/view-url", id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_pdf_uses_signed_url_and_page_width() {
    let mut server = mockito::Server::new_async().await;
    let signed = signed_storage_url("contract.pdf", "abc");
    let _view = mock_view_url(&mut server, "p1", json!({ "url": signed, "encrypted": false })).await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("p1", "contract.pdf", "application/pdf"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Pdf {
            url,
            page_width,
            num_pages,
            converted,
        } => {
            assert_eq!(url, signed);
            assert_eq!(page_width, pdf_page_width(1280, ZoomLevel::default()));
            assert_eq!(num_pages, None);
            assert!(!converted);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(t.cache.get(&signed_url_key("p1")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_pdf_width_follows_zoom() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "p2", json!({ "url": signed_storage_url("a.pdf", "s") })).await;

    let t = dispatcher(&server.url());
    let zoomed = PreviewOptions::new(800, ZoomLevel::new(1.5));
    let content = t
        .dispatcher
        .preview(
            &document("p2", "a.pdf", "application/pdf"),
            &zoomed,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Pdf { page_width, .. } => assert_eq!(page_width, 1020),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_pdf_view_url_failure_is_load_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/p3/view-url")
        .with_status(404)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("p3", "gone.pdf", "application/pdf"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::LoadError, "p3");
}

#[tokio::test]
async fn test_missing_view_url_is_loading() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "p4", json!({ "url": null })).await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("p4", "pending.pdf", "application/pdf"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert!(matches!(
        content,
        PreviewContent::Loading {
            file_type: PreviewFileType::Pdf
        }
    ));
}

#[tokio::test]
async fn test_word_renders_converted_pdf() {
    let mut server = mockito::Server::new_async().await;
    let converted = signed_storage_url("w1-preview.pdf", "conv");
    let _mock = server
        .mock("GET", "/api/documents/w1/preview")
        .with_status(200)
        .with_body(json!({ "previewType": "pdf", "previewUrl": converted, "numPages": 3 }).to_string())
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document(
                "w1",
                "memo.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Pdf {
            url,
            num_pages,
            converted: is_converted,
            ..
        } => {
            assert_eq!(url, converted);
            assert_eq!(num_pages, Some(3));
            assert!(is_converted);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(t.cache.get(&preview_url_key("w1")).await.unwrap().is_some());
    assert!(t.cache.get(&signed_url_key("w1")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_word_without_conversion_is_load_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/w2/preview")
        .with_status(200)
        .with_body(r#"{"previewType":"none"}"#)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("w2", "memo.doc", "application/msword"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::LoadError, "w2");
}

#[tokio::test]
async fn test_spreadsheet_uses_local_markdown() {
    let mut server = mockito::Server::new_async().await;
    let never = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document_with_markdown("x1", "budget.xlsx", "| a | b |\n|---|---|\n| 1 | 2 |"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Spreadsheet { markdown } => assert!(markdown.starts_with("| a | b |")),
        other => panic!("unexpected {:?}", other),
    }
    never.assert_async().await;
}

#[tokio::test]
async fn test_spreadsheet_refreshes_missing_markdown() {
    let mut server = mockito::Server::new_async().await;
    let status = server
        .mock("GET", "/api/documents/x2/status")
        .with_status(200)
        .with_body(
            json!({
                "id": "x2",
                "filename": "q3.xlsx",
                "mimeType": "application/vnd.ms-excel",
                "metadata": { "markdownContent": "| q | rev |" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(&document("x2", "q3.xlsx", "application/vnd.ms-excel"), &options(), &CancellationToken::new())
        .await
        .unwrap();

    match content {
        PreviewContent::Spreadsheet { markdown } => assert_eq!(markdown, "| q | rev |"),
        other => panic!("unexpected {:?}", other),
    }
    status.assert_async().await;
}

#[tokio::test]
async fn test_spreadsheet_without_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/x3/status")
        .with_status(200)
        .with_body(r#"{"id":"x3","filename":"empty.xls"}"#)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("x3", "empty.xls", "application/vnd.ms-excel"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::ContentUnavailable, "x3");
}

#[tokio::test]
async fn test_slides_from_extractor() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/s1/slides")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "metadata": { "title": "Kickoff", "slide_count": 2 },
                "slides": [
                    { "slide_number": 1, "content": "Agenda", "text_count": 1 },
                    { "slide_number": 2, "content": "", "text_count": 0 }
                ],
                "full_text": "Agenda",
                "total_slides": 2,
                "slides_with_text": 1
            })
            .to_string(),
        )
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("s1", "kickoff.pptx", "application/octet-stream"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Slides { deck } => {
            assert_eq!(deck.metadata.title, "Kickoff");
            assert_eq!(deck.non_empty_slides().count(), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_slides_extraction_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/s2/slides")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"File is not a zip file"}"#)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("s2", "broken.ppt", "application/vnd.ms-powerpoint"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::LoadError, "s2");
    if let PreviewContent::Fallback(panel) = content {
        assert_eq!(panel.message, "File is not a zip file");
    }
}

#[tokio::test]
async fn test_stream_image_becomes_blob() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(
        &mut server,
        "i1",
        json!({ "url": "/api/documents/i1/stream", "encrypted": true }),
    )
    .await;
    let stream = server
        .mock("GET", "/api/documents/i1/stream")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(PNG_PIXEL)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(&document("i1", "scan.png", "image/png"), &options(), &CancellationToken::new())
        .await
        .unwrap();

    match content {
        PreviewContent::Image {
            source: ImageSource::Blob(blob),
        } => {
            assert_eq!(blob.bytes.as_ref(), PNG_PIXEL);
            assert!(blob.object_url.starts_with("data:image/png;base64,"));
        }
        other => panic!("unexpected {:?}", other),
    }
    stream.assert_async().await;
}

#[tokio::test]
async fn test_signed_image_is_loaded_directly() {
    let mut server = mockito::Server::new_async().await;
    let signed = signed_storage_url("photo.jpg", "img");
    let _view = mock_view_url(&mut server, "i2", json!({ "url": signed })).await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(&document("i2", "photo.jpg", "image/jpeg"), &options(), &CancellationToken::new())
        .await
        .unwrap();

    match content {
        PreviewContent::Image {
            source: ImageSource::Url { url },
        } => assert_eq!(url, signed),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_image_fetch_failure_is_image_error() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "i3", json!({ "url": "/api/documents/i3/stream" })).await;
    let _mock = server
        .mock("GET", "/api/documents/i3/stream")
        .with_status(401)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(&document("i3", "scan.gif", "image/gif"), &options(), &CancellationToken::new())
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::ImageError, "i3");
}

#[tokio::test]
async fn test_video_and_audio_point_at_resolved_url() {
    let mut server = mockito::Server::new_async().await;
    let clip = signed_storage_url("clip.mp4", "v");
    let _view = mock_view_url(&mut server, "v1", json!({ "url": clip })).await;
    let _view = mock_view_url(&mut server, "a1", json!({ "url": "/api/documents/a1/stream" })).await;

    let t = dispatcher(&server.url());
    let token = CancellationToken::new();

    let video = t
        .dispatcher
        .preview(&document("v1", "clip.mp4", "video/mp4"), &options(), &token)
        .await
        .unwrap();
    match video {
        PreviewContent::Media { media, url } => {
            assert_eq!(media, MediaKind::Video);
            assert_eq!(url, clip);
        }
        other => panic!("unexpected {:?}", other),
    }

    let audio = t
        .dispatcher
        .preview(&document("a1", "memo.m4a", "audio/mp4"), &options(), &token)
        .await
        .unwrap();
    match audio {
        PreviewContent::Media { media, url } => {
            assert_eq!(media, MediaKind::Audio);
            assert_eq!(url, format!("{}/api/documents/a1/stream", server.url()));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_text_fetched_from_backend_with_token() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "t1", json!({ "url": "/api/documents/t1/stream" })).await;
    let stream = server
        .mock("GET", "/api/documents/t1/stream")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("hello\nworld")
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("t1", "notes.txt", "text/plain"),
            &PreviewOptions::new(1280, ZoomLevel::new(2.0)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Text {
            body,
            language,
            font_size,
        } => {
            assert_eq!(body, "hello\nworld");
            assert_eq!(language, None);
            assert_eq!(font_size, 28.0);
        }
        other => panic!("unexpected {:?}", other),
    }
    stream.assert_async().await;
}

#[tokio::test]
async fn test_code_gets_language_tag() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "c1", json!({ "url": "/api/documents/c1/stream" })).await;
    let _mock = server
        .mock("GET", "/api/documents/c1/stream")
        .with_status(200)
        .with_body("print('hi')")
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(
            &document("c1", "main.py", "text/x-python"),
            &options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    match content {
        PreviewContent::Text { body, language, .. } => {
            assert_eq!(body, "print('hi')");
            assert_eq!(language.as_deref(), Some("python"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_text_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    let _view = mock_view_url(&mut server, "t2", json!({ "url": "/api/documents/t2/stream" })).await;
    let _mock = server
        .mock("GET", "/api/documents/t2/stream")
        .with_status(500)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview(&document("t2", "log.txt", "text/plain"), &options(), &CancellationToken::new())
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::TextFetchFailed, "t2");
}

#[tokio::test]
async fn test_archive_and_unknown_need_no_requests() {
    let mut server = mockito::Server::new_async().await;
    let never = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let t = dispatcher(&server.url());
    let token = CancellationToken::new();

    let archive = t
        .dispatcher
        .preview(&document("z1", "backup.zip", "application/zip"), &options(), &token)
        .await
        .unwrap();
    assert_fallback(&archive, FallbackReason::ArchiveNotPreviewable, "z1");

    let unknown = t
        .dispatcher
        .preview(
            &document("u1", "data.bin", "application/octet-stream"),
            &options(),
            &token,
        )
        .await
        .unwrap();
    assert_fallback(&unknown, FallbackReason::Unsupported, "u1");
    never.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_preview_is_error() {
    let mut server = mockito::Server::new_async().await;
    let never = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let t = dispatcher(&server.url());
    let token = CancellationToken::new();
    token.cancel();

    let err = t
        .dispatcher
        .preview(&document("p9", "a.pdf", "application/pdf"), &options(), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, DocviewError::Cancelled));
    never.assert_async().await;
}

#[tokio::test]
async fn test_preview_by_id_fetches_document_first() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/documents/z2/status")
        .with_status(200)
        .with_body(r#"{"document":{"id":"z2","filename":"logs.tar.gz"}}"#)
        .create_async()
        .await;

    let t = dispatcher(&server.url());
    let content = t
        .dispatcher
        .preview_by_id("z2", &options(), &CancellationToken::new())
        .await
        .unwrap();
    assert_fallback(&content, FallbackReason::ArchiveNotPreviewable, "z2");
}
