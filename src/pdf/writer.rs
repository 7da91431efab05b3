//! Serializes finished pages into a PDF document using lopdf

use std::collections::{BTreeMap, BTreeSet};

use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::pdf::canvas::{DrawOp, FinishedPage};
use crate::pdf::fonts::{EmbeddedFont, FontSet};
use crate::style::{Color, FontRole};

/// Resource name of the illustration XObject
const IMAGE_RESOURCE: &str = "Im1";

/// Write `pages` to PDF bytes
///
/// The output carries no timestamps or random identifiers, so the same pages
/// always produce the same bytes.
pub fn write_pdf(config: &RenderConfig, pages: &[FinishedPage]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Characters used per font resource, so TrueType fonts can be subset
    let mut used: BTreeMap<&'static str, (FontRole, BTreeSet<char>)> = BTreeMap::new();
    let mut uses_image = false;
    for op in pages.iter().flat_map(|page| page.ops.iter()) {
        match op {
            DrawOp::Text { font, text, .. } => {
                used.entry(FontSet::resource_name(*font))
                    .or_insert_with(|| (*font, BTreeSet::new()))
                    .1
                    .extend(text.chars());
            }
            DrawOp::Image { .. } => uses_image = true,
            DrawOp::Line { .. } => {}
        }
    }

    let mut embedded: BTreeMap<&'static str, EmbeddedFont> = BTreeMap::new();
    let mut font_resources = Dictionary::new();
    for (name, (role, chars)) in &used {
        let font = config.fonts.font(*role).embed(&mut doc, chars)?;
        font_resources.set(*name, Object::Reference(font.id));
        embedded.insert(*name, font);
    }

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(font_resources));
    if uses_image {
        let image_id = config.illustration.embed(&mut doc);
        let mut xobjects = Dictionary::new();
        xobjects.set(IMAGE_RESOURCE, Object::Reference(image_id));
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    let resources_id = doc.add_object(Object::Dictionary(resources));

    let media_box = Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(config.page.width.pt()),
        Object::Real(config.page.height.pt()),
    ]);

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = content_stream(&page.ops, &embedded);
        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            content.into_bytes(),
        )));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("MediaBox", media_box.clone());
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Reference(resources_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page_dict))));
    }

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(pages.len() as i64));
    pages_object.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut info = Dictionary::new();
    info.set(
        "Producer",
        Object::String(b"pdf-echo".to_vec(), StringFormat::Literal),
    );
    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.compress();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Generate the content stream operators for one page
fn content_stream(ops: &[DrawOp], fonts: &BTreeMap<&'static str, EmbeddedFont>) -> String {
    let mut content = String::new();

    for op in ops {
        match op {
            DrawOp::Text {
                font,
                size,
                color,
                x,
                y,
                text,
            } => {
                let name = FontSet::resource_name(*font);
                let Some(embedded) = fonts.get(name) else {
                    continue;
                };
                content.push_str("BT\n");
                content.push_str(&format!("/{} {:.2} Tf\n", name, size));
                content.push_str(&format!("{} rg\n", rgb(color)));
                content.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", x, y));
                content.push_str(&format!("{} Tj\n", embedded.encode(text)));
                content.push_str("ET\n");
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                content.push_str("q\n");
                content.push_str(&format!("{} RG\n", rgb(color)));
                content.push_str(&format!("{:.2} w\n", width));
                content.push_str(&format!("{:.2} {:.2} m\n", from.0, from.1));
                content.push_str(&format!("{:.2} {:.2} l\n", to.0, to.1));
                content.push_str("S\nQ\n");
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => {
                content.push_str("q\n");
                content.push_str(&format!(
                    "{:.2} 0 0 {:.2} {:.2} {:.2} cm\n",
                    width, height, x, y
                ));
                content.push_str(&format!("/{} Do\n", IMAGE_RESOURCE));
                content.push_str("Q\n");
            }
        }
    }

    content
}

fn rgb(color: &Color) -> String {
    format!("{:.3} {:.3} {:.3}", color.r, color.g, color.b)
}
