use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The ordered list of primitive steps replayed on every rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step with a fresh id.
    pub fn push(&mut self, name: impl Into<String>, primitive: Primitive) -> Uuid {
        let id = Uuid::new_v4();
        self.steps.push(RecipeStep {
            id,
            name: name.into(),
            primitive,
        });
        id
    }
}

/// A single step of the parametric recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: Uuid,
    pub name: String,
    pub primitive: Primitive,
}

/// Primitive solid constructions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Primitive {
    Box {
        origin: [Dim; 3],
        lengths: [Dim; 3],
    },
}

/// A dimension: either a literal or a reference to a parameter element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dim {
    Literal(f64),
    Param {
        param: String,
        #[serde(default = "dim_index_default")]
        row: u32,
        #[serde(default = "dim_index_default")]
        col: u32,
    },
}

fn dim_index_default() -> u32 {
    1
}

impl Dim {
    /// Reference element (1,1) of a named parameter.
    pub fn param(name: impl Into<String>) -> Self {
        Dim::Param {
            param: name.into(),
            row: 1,
            col: 1,
        }
    }
}

impl From<f64> for Dim {
    fn from(v: f64) -> Self {
        Dim::Literal(v)
    }
}
