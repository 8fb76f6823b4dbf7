// src/ingest/pptx.rs
//
// A .pptx file is a zip archive of XML parts. Ingestion walks the slide
// parts in deck order and pulls text runs (`<a:t>`) and table shapes
// (`<a:tbl>`) into an in-memory deck structure.

use std::fs;
use std::io::Read as _;
use std::path::Path;

use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::PipelineError;
use crate::ingest::DataIngestor;
use crate::process::pptx::PptxProcessor;
use crate::process::DataProcessor;
use crate::types::{FormatTag, Slide, SlideDeck, SlideTable};

#[derive(Default)]
pub struct PptxIngestor {
    data: Option<SlideDeck>,
}

impl DataIngestor for PptxIngestor {
    fn tag(&self) -> FormatTag {
        FormatTag::Pptx
    }

    fn load(&mut self, location: &Path) -> Result<(), PipelineError> {
        let load = || -> anyhow::Result<SlideDeck> {
            let file = fs::File::open(location)
                .with_context(|| format!("opening {}", location.display()))?;
            let mut archive = zip::ZipArchive::new(file).context("opening pptx archive")?;

            let mut slide_names: Vec<String> = archive
                .file_names()
                .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
                .map(str::to_string)
                .collect();
            slide_names.sort_by_key(|n| slide_number(n));

            let mut slides = Vec::with_capacity(slide_names.len());
            for name in slide_names {
                let mut xml = String::new();
                archive
                    .by_name(&name)
                    .with_context(|| format!("reading {name}"))?
                    .read_to_string(&mut xml)
                    .with_context(|| format!("decoding {name}"))?;
                slides.push(parse_slide_xml(&xml).with_context(|| format!("parsing {name}"))?);
            }
            anyhow::ensure!(!slides.is_empty(), "presentation has no slides");
            Ok(SlideDeck { slides })
        };
        self.data = Some(load().map_err(|e| PipelineError::ingestion(location, e))?);
        Ok(())
    }

    fn create_processor(&self) -> Result<Box<dyn DataProcessor>, PipelineError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| PipelineError::state("pptx ingestor has no loaded document"))?;
        Ok(Box::new(PptxProcessor::new(data)))
    }
}

fn slide_number(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Event scan over one slide's XML. Text runs outside tables accumulate per
/// paragraph into `texts`; runs inside `<a:tc>` cells build the table grids.
pub(crate) fn parse_slide_xml(xml: &str) -> anyhow::Result<Slide> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut slide = Slide::default();
    let mut current_table: Option<SlideTable> = None;
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell = String::new();
    let mut paragraph = String::new();
    let mut in_cell = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => current_table = Some(SlideTable::default()),
                b"tr" => current_row.clear(),
                b"tc" => {
                    in_cell = true;
                    current_cell.clear();
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e.unescape().context("decoding slide text")?;
                    if in_cell {
                        current_cell.push_str(&text);
                    } else {
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !in_cell {
                        let line = paragraph.trim();
                        if !line.is_empty() {
                            slide.texts.push(line.to_string());
                        }
                        paragraph.clear();
                    }
                }
                b"tc" => {
                    in_cell = false;
                    current_row.push(current_cell.trim().to_string());
                }
                b"tr" => {
                    if let Some(table) = current_table.as_mut() {
                        table.cells.push(std::mem::take(&mut current_row));
                    }
                }
                b"tbl" => {
                    if let Some(table) = current_table.take() {
                        slide.tables.push(table);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => anyhow::bail!("malformed slide xml: {e}"),
            _ => {}
        }
    }
    Ok(slide)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE_WITH_TEXT: &str = r#"
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:txBody>
      <a:p><a:r><a:t>FitPro: Annual Summary 2023</a:t></a:r></a:p>
      <a:p><a:r><a:t>Total Revenue: $</a:t></a:r><a:r><a:t>12,345</a:t></a:r></a:p>
    </p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    const SLIDE_WITH_TABLE: &str = r#"
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:graphicFrame><a:graphic><a:graphicData><a:tbl>
      <a:tr>
        <a:tc><a:txBody><a:p><a:r><a:t>Quarter</a:t></a:r></a:p></a:txBody></a:tc>
        <a:tc><a:txBody><a:p><a:r><a:t>Revenue</a:t></a:r></a:p></a:txBody></a:tc>
      </a:tr>
      <a:tr>
        <a:tc><a:txBody><a:p><a:r><a:t>Q2</a:t></a:r></a:p></a:txBody></a:tc>
        <a:tc><a:txBody><a:p><a:r><a:t>5,000</a:t></a:r></a:p></a:txBody></a:tc>
      </a:tr>
    </a:tbl></a:graphicData></a:graphic></p:graphicFrame>
  </p:spTree></p:cSld>
</p:sld>"#;

    #[test]
    fn text_runs_merge_per_paragraph() {
        let slide = parse_slide_xml(SLIDE_WITH_TEXT).unwrap();
        assert_eq!(
            slide.texts,
            vec!["FitPro: Annual Summary 2023", "Total Revenue: $12,345"]
        );
        assert!(slide.tables.is_empty());
    }

    #[test]
    fn table_cells_build_a_grid_and_stay_out_of_texts() {
        let slide = parse_slide_xml(SLIDE_WITH_TABLE).unwrap();
        assert!(slide.texts.is_empty());
        assert_eq!(slide.tables.len(), 1);
        let grid = &slide.tables[0].cells;
        assert_eq!(grid[0], vec!["Quarter", "Revenue"]);
        assert_eq!(grid[1], vec!["Q2", "5,000"]);
    }

    #[test]
    fn slide_part_names_sort_numerically() {
        let mut names = vec![
            "ppt/slides/slide10.xml".to_string(),
            "ppt/slides/slide2.xml".to_string(),
            "ppt/slides/slide1.xml".to_string(),
        ];
        names.sort_by_key(|n| slide_number(n));
        assert_eq!(names[0], "ppt/slides/slide1.xml");
        assert_eq!(names[2], "ppt/slides/slide10.xml");
    }
}
