use docqa_core::domain::{MediaType, UploadedDocument};
use docqa_core::error::ErrorKind;
use docqa_core::extract::extract;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

/// Build an in-memory PDF. `None` pages carry no text operators, like a scanned image page.
fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn plain_text_round_trips_exactly() {
    let samples = [
        "The refund policy allows returns within 30 days.",
        "  leading and trailing whitespace survive  \n\n",
        "\u{feff}byte order mark is kept",
        "Unicode: Ελληνικά, 中文, العربية, emoji 🚀",
        "line one\r\nline two\r\n",
    ];
    for sample in samples {
        let doc = UploadedDocument::new("notes.txt", "text/plain", sample.as_bytes().to_vec());
        let extracted = extract(&doc).expect("extract");
        assert_eq!(extracted.text, sample);
        assert_eq!(extracted.media_type, MediaType::PlainText);
    }
}

#[test]
fn plain_text_invalid_utf8_is_a_decoding_error() {
    let doc = UploadedDocument::new("latin1.txt", "text/plain", vec![0x63, 0x61, 0x66, 0xe9]);
    let err = extract(&doc).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::DecodingError);
    assert_eq!(err.code, "EXTRACT_DECODING_FAILED");
}

#[test]
fn whitespace_only_text_is_reported_as_empty_document() {
    for body in ["", "   ", "\n\n\t\n"] {
        let doc = UploadedDocument::new("blank.txt", "text/plain", body.as_bytes().to_vec());
        let err = extract(&doc).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    }
}

#[test]
fn unsupported_media_types_are_rejected() {
    let doc = UploadedDocument::new("report.docx", "", b"PK\x03\x04".to_vec());
    let err = extract(&doc).expect_err("docx is not supported");
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

    let doc = UploadedDocument::new("photo.txt", "image/png", b"\x89PNG".to_vec());
    let err = extract(&doc).expect_err("declared type wins over extension");
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn media_type_falls_back_to_extension_when_undeclared() {
    let doc = UploadedDocument::new("README.MD", "", b"# Title".to_vec());
    assert_eq!(doc.resolve_media_type(), Some(MediaType::PlainText));
    assert_eq!(MediaType::from_mime("Text/Plain; charset=utf-8"), Some(MediaType::PlainText));
    assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
    assert_eq!(MediaType::from_file_name("no_extension"), None);
}

#[test]
fn pdf_with_text_yields_page_tagged_text() {
    let bytes = pdf_with_pages(&[Some("Hello World")]);
    let doc = UploadedDocument::new("hello.pdf", "application/pdf", bytes);
    let extracted = extract(&doc).expect("extract");
    assert_eq!(extracted.media_type, MediaType::Pdf);
    assert_eq!(extracted.page_count, 1);
    assert_eq!(extracted.pages_with_text, 1);
    assert!(extracted.text.starts_with("[Page 1]\n"));
    assert!(extracted.text.contains("Hello"));
    assert_eq!(extracted.text_sha256.len(), 64);
}

#[test]
fn pdf_image_only_pages_are_skipped_not_fatal() {
    let bytes = pdf_with_pages(&[None, Some("Second page text"), None]);
    let doc = UploadedDocument::new("mixed.pdf", "", bytes);
    let extracted = extract(&doc).expect("extract");
    assert_eq!(extracted.page_count, 3);
    assert_eq!(extracted.pages_with_text, 1);
    assert!(extracted.text.starts_with("[Page 2]\n"));
    assert!(!extracted.text.contains("[Page 1]"));
    assert!(!extracted.text.contains("[Page 3]"));
}

#[test]
fn pdf_without_any_text_is_empty_document() {
    let bytes = pdf_with_pages(&[None, None]);
    let doc = UploadedDocument::new("scan.pdf", "application/pdf", bytes);
    let err = extract(&doc).expect_err("scanned pdf");
    assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    assert_eq!(err.code, "EXTRACT_EMPTY_DOCUMENT");
}

#[test]
fn garbage_declared_as_pdf_is_a_decoding_error() {
    let doc = UploadedDocument::new("broken.pdf", "application/pdf", b"not a pdf at all".to_vec());
    let err = extract(&doc).expect_err("not a pdf");
    assert_eq!(err.kind(), ErrorKind::DecodingError);
}
