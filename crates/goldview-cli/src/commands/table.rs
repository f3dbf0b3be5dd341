use super::open_experiment;
use crate::cli::TableArgs;
use crate::config::{PartialSettings, TableView};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use goldview::engine::error::EngineError;
use goldview::engine::table::{Projection, ScoreTable};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

const KEY_HEADER: &str = "#";
const COLUMN_GAP: &str = "  ";

pub fn run(args: TableArgs, settings: &PartialSettings, progress: &CliProgressHandler) -> Result<()> {
    let view = settings.table_view(&args);
    let mut model = open_experiment(&args.experiment, settings, progress)?;
    let projection = apply_view(model.table_mut(), &view)?;

    match &args.csv {
        Some(path) => {
            info!("Writing score table to {:?}", path);
            let file = File::create(path)?;
            projection
                .write_csv(BufWriter::new(file))
                .map_err(EngineError::from)?;
            println!(
                "✓ Wrote {} solution(s) to {}",
                projection.rows.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            render(&projection, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Sorts `table` and selects the requested columns.
pub(crate) fn apply_view(table: &mut ScoreTable, view: &TableView) -> Result<Projection> {
    if let Some(column) = &view.sort_by {
        table
            .sort_by(column, view.order)
            .map_err(EngineError::from)?;
    }
    let projection = if view.columns.is_empty() {
        table.to_projection()
    } else {
        table.project(&view.columns).map_err(EngineError::from)?
    };
    Ok(projection)
}

/// Prints a projection as left-aligned text columns, prefixed with the row key.
pub(crate) fn render(projection: &Projection, out: &mut impl Write) -> io::Result<()> {
    let mut widths: Vec<usize> = std::iter::once(KEY_HEADER.len())
        .chain(projection.columns.iter().map(|c| c.chars().count()))
        .collect();
    for row in &projection.rows {
        widths[0] = widths[0].max(row.key.to_string().len());
        for (width, cell) in widths[1..].iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<&str> = std::iter::once(KEY_HEADER)
        .chain(projection.columns.iter().map(String::as_str))
        .collect();
    write_line(out, &header, &widths)?;
    for row in &projection.rows {
        let key = row.key.to_string();
        let cells: Vec<&str> = std::iter::once(key.as_str())
            .chain(row.cells.iter().map(String::as_str))
            .collect();
        write_line(out, &cells, &widths)?;
    }
    Ok(())
}

fn write_line(out: &mut impl Write, cells: &[&str], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    writeln!(out, "{}", line.trim_end())
}
