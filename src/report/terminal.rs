use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::ViewModel;

/// Render the view as a colored terminal report.
pub fn render(view: &ViewModel, quiet: bool) -> Result<()> {
    if quiet {
        println!("{}", view.count_label);
        return Ok(());
    }

    println!(
        "\n {} {}",
        "vuz-ratings".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!(" {} · {}\n", view.period.bold(), view.category.cyan());

    if !view.months.is_empty() {
        println!(" {}\n", month_menu(view));
    }

    match &view.message {
        Some(message) => println!(" {}\n", message.yellow()),
        None => {
            println!("{}", build_table(view));
            println!();
        }
    }

    println!(" {}", view.count_label.bold());
    Ok(())
}

/// Month names in one line: the selected one highlighted, the actual one starred.
fn month_menu(view: &ViewModel) -> String {
    view.months
        .iter()
        .map(|m| {
            let name = if m.actual {
                format!("{}*", m.name)
            } else {
                m.name.clone()
            };
            if m.selected {
                name.green().bold().underline().to_string()
            } else {
                name.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn build_table(view: &ViewModel) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Вуз").add_attribute(Attribute::Bold),
            Cell::new("Балл").add_attribute(Attribute::Bold),
        ]);

    for row in &view.rows {
        let score_color = if row.value.is_some() {
            Color::Green
        } else {
            Color::DarkGrey
        };

        table.add_row(vec![
            Cell::new(row.rank).set_alignment(CellAlignment::Right),
            Cell::new(&row.name),
            Cell::new(&row.score)
                .fg(score_color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}
