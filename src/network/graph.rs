use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
    #[serde(default)]
    pub n_appears: f64,
    #[serde(default)]
    pub colors: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_appearances_char1: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_appearances_char2: Option<u64>,
    #[serde(default)]
    pub number_coappearances: f64,
    #[serde(default)]
    pub proportion_coappearances: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkFile {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

#[derive(Clone, Debug)]
pub struct ResolvedLink {
    pub source: usize,
    pub target: usize,
    pub record: LinkRecord,
}

#[derive(Clone, Debug)]
pub struct Network {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<ResolvedLink>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
