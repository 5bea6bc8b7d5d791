use std::{fs, path::Path};

use calamine::{Data, Reader, open_workbook_auto};

use crate::{Error, Result};

/// Extracted text plus file facts for one office document, before language
/// detection and translation.
#[derive(Clone, Debug)]
pub struct ParsedDocument {
	pub file_name: String,
	pub file_type: String,
	pub text: String,
	/// Sheet names, for spreadsheet documents only.
	pub sheets: Option<Vec<String>>,
}

/// Parses one document by extension. Unrecognized extensions yield
/// [`Error::UnsupportedFormat`]; callers log and continue with the rest of
/// the batch.
pub fn parse_document(path: &Path) -> Result<ParsedDocument> {
	let extension =
		path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);

	match extension.as_deref() {
		Some("docx") => parse_docx(path),
		Some("xlsx") => parse_xlsx(path),
		_ => Err(Error::UnsupportedFormat { path: path.to_path_buf() }),
	}
}

fn parse_docx(path: &Path) -> Result<ParsedDocument> {
	let bytes =
		fs::read(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
	let docx = docx_rs::read_docx(&bytes)
		.map_err(|err| Error::Document { path: path.to_path_buf(), message: err.to_string() })?;
	let mut lines: Vec<String> = Vec::new();

	for child in &docx.document.children {
		match child {
			docx_rs::DocumentChild::Paragraph(paragraph) => {
				let text = paragraph_text(paragraph);

				if !text.trim().is_empty() {
					lines.push(text);
				}
			},
			docx_rs::DocumentChild::Table(table) => lines.extend(table_lines(table)),
			_ => {},
		}
	}

	Ok(ParsedDocument {
		file_name: file_name(path),
		file_type: "docx".to_string(),
		text: lines.join("\n"),
		sheets: None,
	})
}

fn parse_xlsx(path: &Path) -> Result<ParsedDocument> {
	let mut workbook = open_workbook_auto(path)
		.map_err(|err| Error::Document { path: path.to_path_buf(), message: err.to_string() })?;
	let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
	let mut pieces: Vec<String> = Vec::new();

	for name in &sheet_names {
		let Ok(range) = workbook.worksheet_range(name) else {
			continue;
		};
		let rows: Vec<Vec<String>> =
			range.rows().map(|row| row.iter().map(cell_text).collect()).collect();

		pieces.extend(shape_sheet(name, &rows));
	}

	Ok(ParsedDocument {
		file_name: file_name(path),
		file_type: "xlsx".to_string(),
		text: pieces.join("\n\n"),
		sheets: Some(sheet_names),
	})
}

/// Turns one sheet's cell grid into retrievable text blocks.
///
/// A non-empty first row acts as a header row: each data row becomes
/// `Header: value` lines so header-to-cell association survives retrieval.
/// Sheets without headers keep raw row order, cells joined by ` | `.
pub fn shape_sheet(name: &str, rows: &[Vec<String>]) -> Vec<String> {
	let mut pieces = vec![format!("Sheet: {name}")];
	let headers: Vec<String> = rows
		.first()
		.map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
		.unwrap_or_default();

	if headers.iter().any(|header| !header.is_empty()) {
		for row in rows.iter().skip(1) {
			let lines: Vec<String> = row
				.iter()
				.enumerate()
				.filter(|(_, cell)| !cell.trim().is_empty())
				.map(|(index, cell)| match headers.get(index) {
					Some(header) if !header.is_empty() => format!("{header}: {cell}"),
					_ => cell.clone(),
				})
				.collect();

			if !lines.is_empty() {
				pieces.push(lines.join("\n"));
			}
		}
	} else {
		for row in rows {
			let cells: Vec<&str> =
				row.iter().map(String::as_str).filter(|cell| !cell.trim().is_empty()).collect();

			match cells.as_slice() {
				[] => {},
				// A lone cell holding a paragraph keeps its own line breaks.
				[only] if only.contains('\n') => pieces.push((*only).to_string()),
				cells => pieces.push(cells.join(" | ")),
			}
		}
	}

	pieces
}

fn cell_text(cell: &Data) -> String {
	match cell {
		Data::Empty => String::new(),
		Data::String(text) => text.clone(),
		Data::Float(value) if value.fract() == 0.0 => format!("{value:.0}"),
		Data::Float(value) => value.to_string(),
		Data::Int(value) => value.to_string(),
		Data::Bool(true) => "TRUE".to_string(),
		Data::Bool(false) => "FALSE".to_string(),
		Data::DateTime(value) => value.to_string(),
		Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
		Data::Error(error) => format!("#ERROR: {error:?}"),
	}
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
	let mut text = String::new();

	for child in &paragraph.children {
		match child {
			docx_rs::ParagraphChild::Run(run) => push_run_text(run, &mut text),
			docx_rs::ParagraphChild::Hyperlink(link) => {
				for nested in &link.children {
					if let docx_rs::ParagraphChild::Run(run) = nested {
						push_run_text(run, &mut text);
					}
				}
			},
			_ => {},
		}
	}

	text
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
	for child in &run.children {
		match child {
			docx_rs::RunChild::Text(content) => text.push_str(&content.text),
			docx_rs::RunChild::Tab(_) => text.push(' '),
			docx_rs::RunChild::Break(_) => text.push('\n'),
			_ => {},
		}
	}
}

fn table_lines(table: &docx_rs::Table) -> Vec<String> {
	let mut lines = Vec::new();

	for row in &table.rows {
		let docx_rs::TableChild::TableRow(row) = row;
		let cells: Vec<String> = row
			.cells
			.iter()
			.map(|cell| {
				let docx_rs::TableRowChild::TableCell(cell) = cell;
				let mut text = String::new();

				for content in &cell.children {
					if let docx_rs::TableCellContent::Paragraph(paragraph) = content {
						text.push_str(&paragraph_text(paragraph));
					}
				}

				text.trim().to_string()
			})
			.collect();

		if cells.iter().any(|cell| !cell.is_empty()) {
			lines.push(cells.join(" | "));
		}
	}

	lines
}

fn file_name(path: &Path) -> String {
	path.file_name().and_then(|name| name.to_str()).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::*;

	#[test]
	fn header_rows_pair_with_cells() {
		let rows = vec![
			vec!["Reason".to_string(), "Allowed".to_string()],
			vec!["Late delivery".to_string(), "Yes".to_string()],
		];
		let pieces = shape_sheet("Exceptions", &rows);

		assert_eq!(pieces[0], "Sheet: Exceptions");
		assert_eq!(pieces[1], "Reason: Late delivery\nAllowed: Yes");
	}

	#[test]
	fn rows_wider_than_the_header_keep_bare_cells() {
		let rows = vec![
			vec!["Reason".to_string()],
			vec!["Late delivery".to_string(), "extra note".to_string()],
		];
		let pieces = shape_sheet("Exceptions", &rows);

		assert_eq!(pieces[1], "Reason: Late delivery\nextra note");
	}

	#[test]
	fn headerless_sheets_preserve_row_order() {
		let rows = vec![
			vec![String::new(), String::new()],
			vec!["left".to_string(), "right".to_string()],
			vec!["a paragraph\nwith two lines".to_string()],
		];
		let pieces = shape_sheet("Notes", &rows);

		assert_eq!(pieces, vec![
			"Sheet: Notes".to_string(),
			"left | right".to_string(),
			"a paragraph\nwith two lines".to_string(),
		]);
	}

	#[test]
	fn empty_data_rows_produce_no_blocks() {
		let rows = vec![
			vec!["Reason".to_string()],
			vec![String::new()],
		];
		let pieces = shape_sheet("Exceptions", &rows);

		assert_eq!(pieces.len(), 1);
	}

	#[test]
	fn unknown_extensions_are_rejected() {
		let err = parse_document(Path::new("notes.pdf")).expect_err("Expected rejection.");

		assert!(matches!(err, Error::UnsupportedFormat { .. }));
	}
}
