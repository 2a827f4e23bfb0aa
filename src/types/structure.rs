//! Co-folding (structure prediction) payloads.

use super::{id_from_string_or_number, TaskStatus};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Folding backend run by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureModel {
    #[default]
    Chai1,
    Boltz2,
}

impl StructureModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chai1 => "chai1",
            Self::Boltz2 => "boltz2",
        }
    }
}

impl fmt::Display for StructureModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructureModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "chai1" | "chai" => Ok(Self::Chai1),
            "boltz2" | "boltz" => Ok(Self::Boltz2),
            other => Err(Error::validation_with_context(
                format!("unknown structure model '{}'", other),
                ErrorContext::new()
                    .with_field_path("structure.model")
                    .with_details("expected chai1 or boltz2"),
            )),
        }
    }
}

/// One entity of the complex to fold.
///
/// Polymer sequences must be uppercase; the constructors normalize them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Chain {
    Protein { sequence: String },
    Dna { sequence: String },
    Rna { sequence: String },
    Ligand { smiles: String },
}

impl Chain {
    pub fn protein(sequence: impl Into<String>) -> Self {
        Self::Protein {
            sequence: normalize_sequence(&sequence.into()),
        }
    }

    pub fn dna(sequence: impl Into<String>) -> Self {
        Self::Dna {
            sequence: normalize_sequence(&sequence.into()),
        }
    }

    pub fn rna(sequence: impl Into<String>) -> Self {
        Self::Rna {
            sequence: normalize_sequence(&sequence.into()),
        }
    }

    pub fn ligand(smiles: impl Into<String>) -> Self {
        Self::Ligand {
            smiles: smiles.into().trim().to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Protein { .. } => "protein",
            Self::Dna { .. } => "dna",
            Self::Rna { .. } => "rna",
            Self::Ligand { .. } => "ligand",
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        let value = match self {
            Self::Protein { sequence } | Self::Dna { sequence } | Self::Rna { sequence } => {
                sequence.as_str()
            }
            Self::Ligand { smiles } => smiles.as_str(),
        };
        let allowed = |c: char| match self {
            Self::Protein { .. } => c.is_ascii_uppercase(),
            Self::Dna { .. } => matches!(c, 'A' | 'C' | 'G' | 'T' | 'N'),
            Self::Rna { .. } => matches!(c, 'A' | 'C' | 'G' | 'U' | 'N'),
            Self::Ligand { .. } => !c.is_whitespace(),
        };
        let field = match self {
            Self::Ligand { .. } => format!("chains[{}].smiles", index),
            _ => format!("chains[{}].sequence", index),
        };
        if value.is_empty() {
            return Err(Error::validation_with_context(
                format!("{} chain is empty", self.kind()),
                ErrorContext::new().with_field_path(field),
            ));
        }
        if let Some(bad) = value.chars().find(|c| !allowed(*c)) {
            return Err(Error::validation_with_context(
                format!("invalid character '{}' in {} chain", bad, self.kind()),
                ErrorContext::new().with_field_path(field),
            ));
        }
        Ok(())
    }
}

/// Sequences are uppercased and stripped of whitespace (FASTA line breaks).
fn normalize_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructurePredictionRequest {
    pub model: StructureModel,
    pub chains: Vec<Chain>,
    #[serde(default)]
    pub use_msa_server: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StructurePredictionRequest {
    pub fn new(model: StructureModel) -> Self {
        Self {
            model,
            chains: Vec::new(),
            use_msa_server: false,
            name: None,
        }
    }

    pub fn chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn use_msa_server(mut self, enable: bool) -> Self {
        self.use_msa_server = enable;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(Error::validation_with_context(
                "at least one chain is required",
                ErrorContext::new().with_field_path("chains"),
            ));
        }
        for (i, chain) in self.chains.iter().enumerate() {
            chain.validate(i)?;
        }
        let has_polymer = self
            .chains
            .iter()
            .any(|c| !matches!(c, Chain::Ligand { .. }));
        if !has_polymer {
            return Err(Error::validation_with_context(
                "a complex needs at least one protein, DNA, or RNA chain",
                ErrorContext::new().with_field_path("chains"),
            ));
        }
        Ok(())
    }
}

/// A submitted co-folding job, as returned on submission and in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureTask {
    #[serde(alias = "id", deserialize_with = "id_from_string_or_number")]
    pub task_id: String,
    #[serde(default = "unknown_status")]
    pub status: TaskStatus,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unknown_status() -> TaskStatus {
    TaskStatus::Unknown
}

/// Listing answers either with a bare array or wrapped in `{"tasks": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum TaskList {
    Bare(Vec<StructureTask>),
    Wrapped { tasks: Vec<StructureTask> },
}

impl From<TaskList> for Vec<StructureTask> {
    fn from(list: TaskList) -> Self {
        match list {
            TaskList::Bare(tasks) | TaskList::Wrapped { tasks } => tasks,
        }
    }
}
