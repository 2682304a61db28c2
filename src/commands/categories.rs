// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::models::Category;
use crate::store;
use crate::undo::CategoryUndo;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub
                .get_one::<String>("title")
                .context("category title missing")?
                .trim()
                .to_string();
            let icon_id = sub.get_one::<i32>("icon").copied().unwrap_or_default();
            store::upsert_category(
                conn,
                &Category {
                    id: 0,
                    title: title.clone(),
                    icon_id,
                },
            )?;
            println!("Added category '{}'", title);
        }
        Some(("list", sub)) => {
            let categories = store::list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let data = categories
                    .into_iter()
                    .map(|c| vec![c.title, c.icon_id.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Category", "Icon"], data));
            }
        }
        Some(("edit", sub)) => {
            let title = sub.get_one::<String>("title").context("category title missing")?;
            let mut category = store::category_by_title(conn, title.trim())?;
            if let Some(new_title) = sub.get_one::<String>("rename") {
                category.title = new_title.trim().to_string();
            }
            if let Some(icon_id) = sub.get_one::<i32>("icon") {
                category.icon_id = *icon_id;
            }
            store::upsert_category(conn, &category)?;
            println!("Updated category '{}'", category.title);
        }
        Some(("rm", sub)) => {
            let title = sub.get_one::<String>("title").context("category title missing")?;
            let category = store::category_by_title(conn, title)?;
            store::delete_category(conn, category.id)?;
            println!("Removed category '{}'", title);
        }
        Some(("hide", sub)) => {
            let titles: Vec<String> = sub
                .get_many::<String>("title")
                .context("category title missing")?
                .cloned()
                .collect();
            let visible = hide(conn, &titles, sub.get_flag("undo"))?;
            let data = visible.into_iter().map(|c| vec![c.title]).collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        _ => {}
    }
    Ok(())
}

/// Runs the hide/undo flow over `titles` in order and returns the categories
/// left afterwards. Each hide commits the one before it; the last is either
/// restored (`undo`) or committed when the flow ends.
pub fn hide(conn: &Connection, titles: &[String], undo: bool) -> Result<Vec<Category>> {
    let mut names: HashMap<i64, String> = HashMap::new();
    let mut state = CategoryUndo::new();

    for title in titles {
        let category = store::category_by_title(conn, title.trim())?;
        names.insert(category.id, category.title.clone());
        state.hide_with(category.id, |id| commit(conn, id, &names))?;
    }

    if undo {
        state.undo();
        println!("Undone");
    } else {
        state.clear_with(|id| commit(conn, id, &names))?;
    }
    Ok(state.visible(&store::list_categories(conn)?))
}

fn commit(conn: &Connection, id: i64, names: &HashMap<i64, String>) -> Result<()> {
    store::delete_category(conn, id)?;
    println!(
        "Deleted category '{}'",
        names.get(&id).map_or("?", |s| s.as_str())
    );
    Ok(())
}
