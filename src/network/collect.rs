use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::util::title_case;

use super::graph::{LinkRecord, NetworkFile, NodeRecord};
use super::parse::{AppearanceTable, read_appearance_table, read_character_colors};

const UNLISTED_COLOR: &str = "rgb(169, 169, 169)";
// Column name that stands for every Snoopy persona; the node is just "Snoopy".
const SNOOPY_PERSONAS: &str = "snoopy and personas";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairStats {
    pub appears_a: u64,
    pub appears_b: u64,
    pub coappears: u64,
    pub proportion: Option<f64>,
}

pub fn count_coappearances(a: &[bool], b: &[bool]) -> PairStats {
    let mut stats = PairStats {
        appears_a: 0,
        appears_b: 0,
        coappears: 0,
        proportion: None,
    };
    let mut either = 0u64;
    for (&in_a, &in_b) in a.iter().zip(b) {
        stats.appears_a += u64::from(in_a);
        stats.appears_b += u64::from(in_b);
        stats.coappears += u64::from(in_a && in_b);
        either += u64::from(in_a || in_b);
    }
    if either > 0 {
        stats.proportion = Some(stats.coappears as f64 / either as f64);
    }
    stats
}

fn node_id(character: &str) -> String {
    title_case(&character.replace(SNOOPY_PERSONAS, "snoopy"))
}

pub fn build_network(
    table: &AppearanceTable,
    selection: &[String],
    colors: &[String],
) -> Result<NetworkFile> {
    let selection = if selection.is_empty() {
        table.characters.clone()
    } else {
        selection.to_vec()
    };

    let mut columns = Vec::with_capacity(selection.len());
    for character in &selection {
        let column = table
            .column(character)
            .ok_or_else(|| anyhow!("character {character:?} is not a column of the table"))?;
        columns.push(column);
    }

    let names = selection
        .iter()
        .map(|character| node_id(character))
        .collect::<Vec<_>>();

    let nodes = names
        .iter()
        .zip(&columns)
        .enumerate()
        .map(|(index, (name, column))| NodeRecord {
            id: name.clone(),
            group: Some(1),
            n_appears: column.iter().filter(|&&appears| appears).count() as f64,
            colors: colors
                .get(index)
                .cloned()
                .unwrap_or_else(|| UNLISTED_COLOR.to_owned()),
        })
        .collect::<Vec<_>>();

    let mut links = Vec::new();
    for first in 0..selection.len() {
        for second in (first + 1)..selection.len() {
            let stats = count_coappearances(columns[first], columns[second]);
            links.push(LinkRecord {
                source: names[first].clone(),
                target: names[second].clone(),
                number_appearances_char1: Some(stats.appears_a),
                number_appearances_char2: Some(stats.appears_b),
                number_coappearances: stats.coappears as f64,
                proportion_coappearances: stats.proportion,
            });
        }
    }

    Ok(NetworkFile { nodes, links })
}

pub fn build_network_file(
    counts: &Path,
    colors: Option<&Path>,
    selection: &[String],
    output: &Path,
) -> Result<()> {
    let table = read_appearance_table(counts)?;
    let colors = match colors {
        Some(path) => read_character_colors(path)?,
        None => Vec::new(),
    };

    let network = build_network(&table, selection, &colors)?;
    let json = serde_json::to_string_pretty(&network).context("failed to encode network JSON")?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write network file {}", output.display()))?;

    info!(
        nodes = network.nodes.len(),
        links = network.links.len(),
        output = %output.display(),
        "wrote network file"
    );
    Ok(())
}
