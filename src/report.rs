//! PPTX Report Module
//! Writes the dashboard as a PowerPoint deck, one slide per panel: the panel
//! title as a text box and the rendered panel image beneath it.
//!
//! The package is assembled directly as ZIP/XML parts.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use zip::write::FileOptions;
use zip::ZipWriter;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("report has no slides")]
    Empty,
}

/// One report slide.
#[derive(Debug, Clone)]
pub struct Slide {
    pub title: String,
    /// PNG bytes
    pub image: Vec<u8>,
}

/// EMU (English Metric Units): 914400 EMU = 1 inch
const EMU_PER_INCH: i64 = 914400;
/// 10 x 7.5 inch slide
const SLIDE_WIDTH: i64 = 9144000;
const SLIDE_HEIGHT: i64 = 6858000;

const MARGIN: i64 = EMU_PER_INCH / 2;
const TITLE_TOP: i64 = EMU_PER_INCH * 3 / 10;
const TITLE_HEIGHT: i64 = EMU_PER_INCH * 7 / 10;
const IMAGE_TOP: i64 = TITLE_TOP + TITLE_HEIGHT + EMU_PER_INCH / 5;

/// Rendered images should use this aspect ratio to fill the picture box.
pub const IMAGE_ASPECT: f64 = (SLIDE_WIDTH - 2 * MARGIN) as f64 / (SLIDE_HEIGHT - IMAGE_TOP - MARGIN / 2) as f64;

pub struct ReportWriter;

impl ReportWriter {
    /// Write the report to `output_path`.
    pub fn write_file(slides: &[Slide], output_path: &Path, title: &str) -> Result<(), ReportError> {
        let file = File::create(output_path)?;
        Self::write(file, slides, title)?;
        info!(
            path = %output_path.display(),
            slides = slides.len(),
            "report written"
        );
        Ok(())
    }

    /// Write the report package into any seekable writer.
    pub fn write<W: Write + Seek>(writer: W, slides: &[Slide], title: &str) -> Result<W, ReportError> {
        if slides.is_empty() {
            return Err(ReportError::Empty);
        }

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();
        let slide_count = slides.len();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml(slide_count).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;
        zip.write_all(Self::presentation_rels_xml(slide_count).as_bytes())?;

        zip.start_file("ppt/presentation.xml", options)?;
        zip.write_all(Self::presentation_xml(slide_count).as_bytes())?;

        for (idx, slide) in slides.iter().enumerate() {
            let num = idx + 1;

            zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", num), options)?;
            zip.write_all(Self::slide_rels_xml(num).as_bytes())?;

            zip.start_file(format!("ppt/slides/slide{}.xml", num), options)?;
            zip.write_all(Self::slide_xml(&slide.title).as_bytes())?;

            zip.start_file(format!("ppt/media/image{}.png", num), options)?;
            zip.write_all(&slide.image)?;
        }

        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
        zip.write_all(SLIDE_LAYOUT.as_bytes())?;
        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
        zip.write_all(LAYOUT_RELS.as_bytes())?;

        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
        zip.write_all(SLIDE_MASTER.as_bytes())?;
        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
        zip.write_all(MASTER_RELS.as_bytes())?;

        zip.start_file("ppt/theme/theme1.xml", options)?;
        zip.write_all(THEME.as_bytes())?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(Self::core_props_xml(title).as_bytes())?;
        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(Self::app_props_xml(slide_count).as_bytes())?;

        Ok(zip.finish()?)
    }

    fn content_types_xml(slide_count: usize) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
        );
        for i in 1..=slide_count {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                i
            ));
            xml.push('\n');
        }
        xml.push_str("</Types>");
        xml
    }

    /// rId1 is the master, rId2 the theme, slides start at rId3.
    fn presentation_rels_xml(slide_count: usize) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
"#,
        );
        for i in 1..=slide_count {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                i + 2,
                i
            ));
            xml.push('\n');
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn presentation_xml(slide_count: usize) -> String {
        let slide_ids: String = (1..=slide_count)
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 2))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst>{}</p:sldIdLst>
<p:sldSz cx="{}" cy="{}" type="screen4x3"/>
<p:notesSz cx="{}" cy="{}"/>
</p:presentation>"#,
            slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
        )
    }

    fn slide_rels_xml(image_id: usize) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image{}.png"/>
</Relationships>"#,
            image_id
        )
    }

    fn slide_xml(title: &str) -> String {
        let content_width = SLIDE_WIDTH - 2 * MARGIN;
        let image_height = SLIDE_HEIGHT - IMAGE_TOP - MARGIN / 2;

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld>
<p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
<p:sp>
<p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="{margin}" y="{title_top}"/><a:ext cx="{width}" cy="{title_height}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>
<p:txBody><a:bodyPr anchor="ctr"/><a:lstStyle/><a:p><a:r><a:rPr lang="id-ID" sz="2400" b="1"/><a:t>{title}</a:t></a:r></a:p></p:txBody>
</p:sp>
<p:pic>
<p:nvPicPr><p:cNvPr id="3" name="Panel"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>
<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>
<p:spPr><a:xfrm><a:off x="{margin}" y="{image_top}"/><a:ext cx="{width}" cy="{image_height}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>
</p:pic>
</p:spTree>
</p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
            margin = MARGIN,
            title_top = TITLE_TOP,
            width = content_width,
            title_height = TITLE_HEIGHT,
            title = xml_escape(title),
            image_top = IMAGE_TOP,
            image_height = image_height,
        )
    }

    fn core_props_xml(title: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{}</dc:title>
<dc:creator>COVIDinfo</dc:creator>
<cp:lastModifiedBy>COVIDinfo</cp:lastModifiedBy>
<cp:revision>1</cp:revision>
</cp:coreProperties>"#,
            xml_escape(title)
        )
    }

    fn app_props_xml(slide_count: usize) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>COVIDinfo</Application>
<PresentationFormat>On-screen Show (4:3)</PresentationFormat>
<Slides>{}</Slides>
<Notes>0</Notes>
<HiddenSlides>0</HiddenSlides>
<ScaleCrop>false</ScaleCrop>
<LinksUpToDate>false</LinksUpToDate>
<SharedDoc>false</SharedDoc>
<HyperlinksChanged>false</HyperlinksChanged>
<AppVersion>16.0000</AppVersion>
</Properties>"#,
            slide_count
        )
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">
<p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#;

const LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>
</p:sldMaster>"#;

const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="COVIDinfo">
<a:themeElements>
<a:clrScheme name="COVIDinfo"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="47A1BF"/></a:accent1><a:accent2><a:srgbClr val="E332B4"/></a:accent2><a:accent3><a:srgbClr val="99E332"/></a:accent3><a:accent4><a:srgbClr val="FFD036"/></a:accent4><a:accent5><a:srgbClr val="FC0339"/></a:accent5><a:accent6><a:srgbClr val="34EB6E"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme>
<a:fontScheme name="COVIDinfo"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>
<a:fmtScheme name="COVIDinfo"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme>
</a:themeElements>
<a:objectDefaults/>
<a:extraClrSchemeLst/>
</a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn slides() -> Vec<Slide> {
        vec![
            Slide {
                title: "Population Summary".to_string(),
                image: vec![0x89, b'P', b'N', b'G'],
            },
            Slide {
                title: "Populasi Per KM Persegi & Kasus Terkonfirmasi".to_string(),
                image: vec![0x89, b'P', b'N', b'G', 1],
            },
        ]
    }

    #[test]
    fn one_slide_and_image_per_panel() {
        let cursor = ReportWriter::write(Cursor::new(Vec::new()), &slides(), "COVIDinfo").unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let slide_parts = names
            .iter()
            .filter(|n| n.starts_with("ppt/slides/slide"))
            .count();
        let media = names.iter().filter(|n| n.starts_with("ppt/media/")).count();
        assert_eq!(slide_parts, 2);
        assert_eq!(media, 2);

        let mut image = Vec::new();
        archive
            .by_name("ppt/media/image2.png")
            .unwrap()
            .read_to_end(&mut image)
            .unwrap();
        assert_eq!(image.len(), 5);
    }

    #[test]
    fn titles_are_escaped() {
        let cursor = ReportWriter::write(Cursor::new(Vec::new()), &slides(), "A & B").unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Persegi &amp; Kasus"));
        assert!(!xml.contains("Persegi & Kasus"));
    }

    #[test]
    fn empty_report_is_rejected() {
        let err = ReportWriter::write(Cursor::new(Vec::new()), &[], "x").unwrap_err();
        assert!(matches!(err, ReportError::Empty));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(xml_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
