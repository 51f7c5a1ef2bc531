//! Board column order commands — `pms kanban`.
//!
//! These only touch the local layout file and work offline.

use anyhow::Result;

use pms::kanban::{ColumnId, ColumnOrderStore, move_column};

use super::load_config;
use crate::{Cli, KanbanCommands};

fn print_order(phase_id: &str, order: &[ColumnId]) {
    println!("{} {}", console::style("Phase").bold(), phase_id);
    for (position, column) in order.iter().enumerate() {
        println!(
            "  {}. {} {}",
            position + 1,
            column.title(),
            console::style(format!("({})", column.as_str())).dim()
        );
    }
}

pub fn cmd_kanban(cli: &Cli, command: KanbanCommands) -> Result<()> {
    let config = load_config(cli)?;
    let store = ColumnOrderStore::new(config.kanban_file());

    match command {
        KanbanCommands::Show { phase_id } => {
            let order = store.load(Some(&phase_id))?;
            print_order(&phase_id, &order);
        }
        KanbanCommands::Move { phase_id, from, to } => {
            let order = store.load(Some(&phase_id))?;
            let valid = 1..=order.len();
            if !valid.contains(&from) || !valid.contains(&to) {
                anyhow::bail!("Positions must be between 1 and {}", order.len());
            }
            let moved = move_column(&order, from - 1, to - 1);
            store.save(&phase_id, &moved)?;
            print_order(&phase_id, &moved);
        }
        KanbanCommands::Reset { phase_id } => {
            store.reset(&phase_id)?;
            println!("Column order for phase {} reset to default.", phase_id);
        }
    }

    Ok(())
}
