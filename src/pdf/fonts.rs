//! Font registration, metrics and embedding
//!
//! Each logical [`FontRole`] resolves to a TrueType file when one can be
//! loaded, and to one of the standard 14 PDF fonts otherwise. The fallback is
//! silent as far as the rendered document is concerned.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use ttf_parser::Face;

use crate::error::{Error, Result};
use crate::style::FontRole;

pub const BODY_FONT_FILE: &str = "DejaVuSans.ttf";
pub const MONO_FONT_FILE: &str = "DejaVuSansMono.ttf";
pub const MONO_BOLD_FONT_FILE: &str = "DejaVuSansMono-Bold.ttf";

/// Width used for characters a font has no glyph for, in 1000ths of an em
const MISSING_GLYPH_WIDTH: f32 = 500.0;

/// One of the standard 14 PDF fonts, used with WinAnsiEncoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    Courier,
    CourierBold,
}

impl BuiltinFont {
    pub fn base_font(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
        }
    }

    fn char_width(&self, ch: char) -> f32 {
        match self {
            BuiltinFont::Courier | BuiltinFont::CourierBold => 600.0,
            BuiltinFont::Helvetica => helvetica_width(char_to_winansi(ch)),
        }
    }
}

/// Approximate Helvetica widths at 1000 units/em, by WinAnsi byte
fn helvetica_width(byte: u8) -> f32 {
    match byte {
        b' ' | 0xA0 => 278.0,
        b'!' | b',' | b'.' | b'/' | b':' | b';' => 278.0,
        b'"' => 355.0,
        b'(' | b')' | b'-' | b'[' | b']' | b'`' => 333.0,
        b'\'' => 191.0,
        b'*' => 389.0,
        b'+' | b'<' | b'=' | b'>' | b'~' => 584.0,
        b'@' => 1015.0,
        b'{' | b'}' => 334.0,
        b'|' => 260.0,
        b'0'..=b'9' | b'#' | b'$' | b'?' | b'_' => 556.0,
        b'%' => 889.0,
        b'&' => 667.0,
        b'I' => 278.0,
        b'J' => 500.0,
        b'M' => 833.0,
        b'W' => 944.0,
        b'C' | b'D' | b'G' | b'H' | b'N' | b'O' | b'Q' | b'R' | b'U' => 722.0,
        b'A'..=b'Z' => 667.0,
        b'f' | b't' => 278.0,
        b'i' | b'j' | b'l' => 222.0,
        b'm' => 833.0,
        b'w' => 722.0,
        b'r' => 333.0,
        b'c' | b'k' | b's' | b'v' | b'x' | b'y' | b'z' => 500.0,
        b'a'..=b'z' => 556.0,
        _ => 556.0,
    }
}

/// Map a character to its WinAnsiEncoding byte, `?` when unrepresentable
pub fn char_to_winansi(ch: char) -> u8 {
    match ch as u32 {
        0x20..=0x7E | 0xA0..=0xFF => ch as u8,
        0x20AC => 0x80,
        0x2026 => 0x85,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        _ => b'?',
    }
}

#[derive(Debug, Clone, Copy)]
struct Glyph {
    id: u16,
    /// Advance width in 1000ths of an em
    advance: f32,
}

/// A parsed TrueType font kept in memory for the life of the process
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: [f32; 4],
    glyphs: HashMap<char, Glyph>,
}

impl TrueTypeFont {
    /// Load and parse a font file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().replace([' ', '-'], ""))
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        Self::from_bytes(name, data)
    }

    /// Parse font data already in memory
    pub fn from_bytes(name: String, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("{}: {}", name, e)))?;

        let units = f32::from(face.units_per_em());
        let scale = |v: i16| f32::from(v) / units * 1000.0;

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code_point| {
                    let Some(ch) = char::from_u32(code_point) else {
                        return;
                    };
                    if let Some(gid) = subtable.glyph_index(code_point) {
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                        glyphs.entry(ch).or_insert(Glyph {
                            id: gid.0,
                            advance: f32::from(advance) / units * 1000.0,
                        });
                    }
                });
            }
        }

        if glyphs.is_empty() {
            return Err(Error::Font(format!("{}: no Unicode character map", name)));
        }

        let bb = face.global_bounding_box();
        let ascent = scale(face.ascender());
        let descent = scale(face.descender());
        let cap_height = face.capital_height().map(scale).unwrap_or(ascent);
        let bbox = [scale(bb.x_min), scale(bb.y_min), scale(bb.x_max), scale(bb.y_max)];

        Ok(Self {
            name,
            data,
            ascent,
            descent,
            cap_height,
            bbox,
            glyphs,
        })
    }
}

/// A font ready for measuring and embedding
#[derive(Debug, Clone)]
pub enum LoadedFont {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFont),
}

impl LoadedFont {
    /// Width of a character in 1000ths of an em
    pub fn char_width(&self, ch: char) -> f32 {
        match self {
            LoadedFont::Builtin(font) => font.char_width(ch),
            LoadedFont::TrueType(font) => font
                .glyphs
                .get(&ch)
                .map(|g| g.advance)
                .unwrap_or(MISSING_GLYPH_WIDTH),
        }
    }

    /// Width of a string at the given size, in points
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch)).sum::<f32>() * font_size / 1000.0
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LoadedFont::Builtin(_))
    }

    /// Write the font objects into `doc`, covering the characters in `used`
    pub fn embed(&self, doc: &mut Document, used: &BTreeSet<char>) -> Result<EmbeddedFont> {
        match self {
            LoadedFont::Builtin(font) => {
                let mut dict = Dictionary::new();
                dict.set("Type", Object::Name(b"Font".to_vec()));
                dict.set("Subtype", Object::Name(b"Type1".to_vec()));
                dict.set("BaseFont", Object::Name(font.base_font().as_bytes().to_vec()));
                dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

                Ok(EmbeddedFont {
                    id: doc.add_object(Object::Dictionary(dict)),
                    encoding: FontEncoding::WinAnsi,
                })
            }
            LoadedFont::TrueType(font) => embed_truetype(doc, font, used),
        }
    }
}

/// How text must be encoded for a font written into the document
#[derive(Debug, Clone)]
pub enum FontEncoding {
    WinAnsi,
    /// Character to glyph id in the subset font
    Identity(BTreeMap<char, u16>),
}

/// A font object in the output document
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    pub id: ObjectId,
    pub encoding: FontEncoding,
}

impl EmbeddedFont {
    /// Encode text as a PDF string operand for `Tj`
    pub fn encode(&self, text: &str) -> String {
        match &self.encoding {
            FontEncoding::WinAnsi => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('(');
                for byte in text.chars().map(char_to_winansi) {
                    match byte {
                        b'\\' | b'(' | b')' => {
                            out.push('\\');
                            out.push(byte as char);
                        }
                        0x20..=0x7E => out.push(byte as char),
                        _ => out.push_str(&format!("\\{:03o}", byte)),
                    }
                }
                out.push(')');
                out
            }
            FontEncoding::Identity(char_to_gid) => {
                let mut out = String::with_capacity(text.len() * 4 + 2);
                out.push('<');
                for ch in text.chars() {
                    let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
                    out.push_str(&format!("{:04X}", gid));
                }
                out.push('>');
                out
            }
        }
    }
}

/// Embed a TrueType font as a Type0 composite font with Identity-H encoding,
/// subset to the glyphs in `used`
fn embed_truetype(
    doc: &mut Document,
    font: &TrueTypeFont,
    used: &BTreeSet<char>,
) -> Result<EmbeddedFont> {
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = BTreeMap::new();
    let mut widths: BTreeMap<u16, f32> = BTreeMap::new();
    for &ch in used {
        if let Some(glyph) = font.glyphs.get(&ch) {
            let new_gid = remapper.remap(glyph.id);
            char_to_gid.insert(ch, new_gid);
            widths.insert(new_gid, glyph.advance);
        }
    }

    let subset = subsetter::subset(&font.data, 0, &remapper)
        .map_err(|e| Error::Font(format!("subsetting {} failed: {}", font.name, e)))?;

    let mut font_file_dict = Dictionary::new();
    font_file_dict.set("Length1", Object::Integer(subset.len() as i64));
    let font_file_id = doc.add_object(Object::Stream(Stream::new(font_file_dict, subset)));

    let ps_name = font.name.as_bytes().to_vec();

    let mut descriptor = Dictionary::new();
    descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
    descriptor.set("FontName", Object::Name(ps_name.clone()));
    descriptor.set("Flags", Object::Integer(32)); // Nonsymbolic
    descriptor.set(
        "FontBBox",
        Object::Array(font.bbox.iter().map(|v| Object::Real(*v)).collect()),
    );
    descriptor.set("ItalicAngle", Object::Integer(0));
    descriptor.set("Ascent", Object::Real(font.ascent));
    descriptor.set("Descent", Object::Real(font.descent));
    descriptor.set("CapHeight", Object::Real(font.cap_height));
    descriptor.set("StemV", Object::Integer(80));
    descriptor.set("FontFile2", Object::Reference(font_file_id));
    let descriptor_id = doc.add_object(Object::Dictionary(descriptor));

    // W array: gid [width] pairs
    let mut w = Vec::with_capacity(widths.len() * 2);
    for (gid, width) in &widths {
        w.push(Object::Integer(i64::from(*gid)));
        w.push(Object::Array(vec![Object::Real(*width)]));
    }

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", Object::Name(b"Font".to_vec()));
    cid_font.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
    cid_font.set("BaseFont", Object::Name(ps_name.clone()));
    cid_font.set(
        "CIDSystemInfo",
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Registry", Object::String(b"Adobe".to_vec(), StringFormat::Literal)),
            ("Ordering", Object::String(b"Identity".to_vec(), StringFormat::Literal)),
            ("Supplement", Object::Integer(0)),
        ])),
    );
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
    cid_font.set("DW", Object::Integer(0));
    cid_font.set("W", Object::Array(w));
    let cid_font_id = doc.add_object(Object::Dictionary(cid_font));

    let to_unicode_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(&char_to_gid).into_bytes(),
    )));

    let mut type0 = Dictionary::new();
    type0.set("Type", Object::Name(b"Font".to_vec()));
    type0.set("Subtype", Object::Name(b"Type0".to_vec()));
    type0.set("BaseFont", Object::Name(ps_name));
    type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
    type0.set("DescendantFonts", Object::Array(vec![Object::Reference(cid_font_id)]));
    type0.set("ToUnicode", Object::Reference(to_unicode_id));

    Ok(EmbeddedFont {
        id: doc.add_object(Object::Dictionary(type0)),
        encoding: FontEncoding::Identity(char_to_gid),
    })
}

/// Build a ToUnicode CMap mapping subset glyph ids back to characters
fn to_unicode_cmap(char_to_gid: &BTreeMap<char, u16>) -> String {
    // One entry per glyph; the first character wins when glyphs are shared
    let mut gid_to_char: BTreeMap<u16, char> = BTreeMap::new();
    for (&ch, &gid) in char_to_gid {
        gid_to_char.entry(gid).or_insert(ch);
    }

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS)\n\
         /Supplement 0\n\
         >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(u16, char)> = gid_to_char.into_iter().collect();
    // At most 100 entries per bfchar section
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// The fonts behind every logical role, resolved once at startup
#[derive(Debug, Clone)]
pub struct FontSet {
    body: LoadedFont,
    mono: LoadedFont,
    mono_bold: LoadedFont,
}

impl FontSet {
    /// Standard 14 fonts only
    pub fn builtin() -> Self {
        Self {
            body: LoadedFont::Builtin(BuiltinFont::Helvetica),
            mono: LoadedFont::Builtin(BuiltinFont::Courier),
            mono_bold: LoadedFont::Builtin(BuiltinFont::CourierBold),
        }
    }

    /// Load the DejaVu fonts from `dir`, substituting a standard font for
    /// each one that is missing or unreadable
    pub fn load(dir: &Path) -> Self {
        Self {
            body: load_or_fallback(&dir.join(BODY_FONT_FILE), BuiltinFont::Helvetica),
            mono: load_or_fallback(&dir.join(MONO_FONT_FILE), BuiltinFont::Courier),
            mono_bold: load_or_fallback(&dir.join(MONO_BOLD_FONT_FILE), BuiltinFont::CourierBold),
        }
    }

    /// Font behind a role. Headings share the body font.
    pub fn font(&self, role: FontRole) -> &LoadedFont {
        match role {
            FontRole::Body | FontRole::Heading => &self.body,
            FontRole::Mono => &self.mono,
            FontRole::MonoBold => &self.mono_bold,
        }
    }

    /// Name of the font in page resources
    pub fn resource_name(role: FontRole) -> &'static str {
        match role {
            FontRole::Body | FontRole::Heading => "F1",
            FontRole::Mono => "F2",
            FontRole::MonoBold => "F3",
        }
    }
}

fn load_or_fallback(path: &Path, fallback: BuiltinFont) -> LoadedFont {
    if !path.exists() {
        log::debug!("Font {} not found, using {}", path.display(), fallback.base_font());
        return LoadedFont::Builtin(fallback);
    }

    match TrueTypeFont::load(path) {
        Ok(font) => {
            log::info!("Registered font {}", path.display());
            LoadedFont::TrueType(font)
        }
        Err(e) => {
            log::debug!("Font {} unusable ({}), using {}", path.display(), e, fallback.base_font());
            LoadedFont::Builtin(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fonts_fall_back() {
        let fonts = FontSet::load(Path::new("/nonexistent/fonts"));
        assert!(fonts.font(FontRole::Body).is_builtin());
        assert!(fonts.font(FontRole::Mono).is_builtin());
        assert!(fonts.font(FontRole::MonoBold).is_builtin());
    }

    #[test]
    fn test_invalid_font_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BODY_FONT_FILE), b"not a font").unwrap();
        let fonts = FontSet::load(dir.path());
        assert!(fonts.font(FontRole::Body).is_builtin());
    }

    #[test]
    fn test_heading_shares_body_font() {
        assert_eq!(
            FontSet::resource_name(FontRole::Heading),
            FontSet::resource_name(FontRole::Body)
        );
    }

    #[test]
    fn test_courier_is_monospaced() {
        let font = LoadedFont::Builtin(BuiltinFont::Courier);
        assert_eq!(font.text_width("iiii", 10.0), font.text_width("MMMM", 10.0));
        assert!((font.text_width("abcde", 8.0) - 24.0).abs() < 0.001);
    }

    #[test]
    fn test_winansi_encoding() {
        let font = EmbeddedFont {
            id: (1, 0),
            encoding: FontEncoding::WinAnsi,
        };
        assert_eq!(font.encode("Page 1 of 2"), "(Page 1 of 2)");
        assert_eq!(font.encode("a(b)\\"), "(a\\(b\\)\\\\)");
        assert_eq!(font.encode("a\u{a0}b"), "(a\\240b)");
        assert_eq!(font.encode("Привет"), "(??????)");
    }

    #[test]
    fn test_identity_encoding() {
        let mut map = BTreeMap::new();
        map.insert('A', 1u16);
        map.insert('b', 0x2Au16);
        let font = EmbeddedFont {
            id: (1, 0),
            encoding: FontEncoding::Identity(map),
        };
        assert_eq!(font.encode("Ab?"), "<0001002A0000>");
    }

    #[test]
    fn test_to_unicode_cmap_entries() {
        let mut map = BTreeMap::new();
        map.insert('A', 1u16);
        map.insert('Ж', 2u16);
        let cmap = to_unicode_cmap(&map);
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0001> <0041>"));
        assert!(cmap.contains("<0002> <0416>"));
    }
}
