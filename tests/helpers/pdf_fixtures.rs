use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

const LINE_HEIGHT: i64 = 14;

/// Builder for small synthetic PDFs.
pub struct PdfFixture {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
    info: Option<ObjectId>,
}

impl PdfFixture {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        Self {
            doc,
            pages_id,
            font_id,
            kids: Vec::new(),
            info: None,
        }
    }

    /// One page whose lines are drawn top to bottom.
    pub fn text_page(mut self, lines: &[&str]) -> Self {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-LINE_HEIGHT).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => self.font_id },
        };
        self.add_page(Content { operations }, resources);
        self
    }

    /// A page that only paints a 1x1 grey image.
    pub fn image_page(mut self) -> Self {
        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0x80],
        ));
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![100.into(), 0.into(), 0.into(), 100.into(), 72.into(), 600.into()],
                ),
                Operation::new("Do", vec!["Im1".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let resources = dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        };
        self.add_page(content, resources);
        self
    }

    pub fn title(mut self, title: &str, author: &str) -> Self {
        self.info = Some(self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal(author),
            "Producer" => Object::string_literal("medingest tests"),
        }));
        self
    }

    fn add_page(&mut self, content: Content, resources: lopdf::Dictionary) {
        let bytes = content.encode().expect("content stream encodes");
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.kids.push(page_id.into());
    }

    pub fn into_document(mut self) -> Document {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        if let Some(info_id) = self.info {
            self.doc.trailer.set("Info", info_id);
        }
        self.doc
    }

    pub fn to_bytes(self) -> Vec<u8> {
        let mut doc = self.into_document();
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("fixture PDF serialises");
        buffer
    }

    pub fn write(self, dir: &Path, name: &str) -> PathBuf {
        write_bytes(dir, name, &self.to_bytes())
    }
}

pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("fixture written");
    path
}

/// One text page per entry of `pages`.
pub fn write_text_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    pages
        .iter()
        .fold(PdfFixture::new(), |fixture, text| fixture.text_page(&[text]))
        .write(dir, name)
}

pub fn write_image_only_pdf(dir: &Path, name: &str) -> PathBuf {
    PdfFixture::new().image_page().write(dir, name)
}

/// A readable text PDF whose trailer declares standard security.
pub fn write_encrypted_pdf(dir: &Path, name: &str) -> PathBuf {
    let mut doc = PdfFixture::new()
        .text_page(&["Confidential clinical study"])
        .into_document();
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0u8; 32]),
        "U" => Object::string_literal(vec![0u8; 32]),
        "P" => -44,
    });
    doc.trailer.set("Encrypt", encrypt_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture PDF serialises");
    write_bytes(dir, name, &buffer)
}
