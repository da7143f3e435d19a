use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::graph::{Network, NetworkFile, ResolvedLink};

#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse network JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("node id {id:?} appears more than once")]
    DuplicateNode { id: String },

    #[error("link {index} references unknown node {id:?}")]
    UnresolvedLink { index: usize, id: String },
}

pub fn load_network(path: &Path) -> Result<Network, LoadFailure> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadFailure::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_network(&raw)
}

pub fn parse_network(raw: &str) -> Result<Network, LoadFailure> {
    let file: NetworkFile = serde_json::from_str(raw)?;
    resolve_network(file)
}

pub fn resolve_network(file: NetworkFile) -> Result<Network, LoadFailure> {
    let mut index_by_id = HashMap::with_capacity(file.nodes.len());
    for (index, node) in file.nodes.iter().enumerate() {
        if index_by_id.insert(node.id.clone(), index).is_some() {
            return Err(LoadFailure::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    let mut links = Vec::with_capacity(file.links.len());
    for (index, record) in file.links.into_iter().enumerate() {
        let lookup = |id: &str| {
            index_by_id
                .get(id)
                .copied()
                .ok_or_else(|| LoadFailure::UnresolvedLink {
                    index,
                    id: id.to_owned(),
                })
        };
        let source = lookup(&record.source)?;
        let target = lookup(&record.target)?;
        links.push(ResolvedLink {
            source,
            target,
            record,
        });
    }

    Ok(Network {
        nodes: file.nodes,
        links,
    })
}
