//! JSON description of the packers used for the fields of a message.

use anyhow::Context;
use cgmath::{Vector2, Vector3};
use derive_more::From;
use packers::{
    FloatPacker, Packer, PositionPacker, QuaternionPacker, UIntVariablePacker, Vector2Packer,
    Vector3Packer,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::Result;

#[derive(Debug, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

#[derive(Debug, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// The parameters of a packer, tagged by the `kind` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Float {
        max: f32,
        precision: f32,
    },
    Vector2 {
        max: [f32; 2],
        precision: [f32; 2],
    },
    Vector3 {
        max: [f32; 3],
        precision: [f32; 3],
    },
    Position {
        min: [f32; 3],
        max: [f32; 3],
        precision: f32,
    },
    Quaternion {
        bits_per_element: u32,
    },
    #[serde(rename = "uint_variable")]
    UIntVariable {
        small: u32,
        medium: u32,
        large: u32,
    },
}

/// A configured packer for one field.
#[derive(Debug, Copy, Clone, From)]
pub enum FieldPacker {
    Float(FloatPacker),
    Vector2(Vector2Packer),
    Vector3(Vector3Packer),
    Position(PositionPacker),
    Quaternion(QuaternionPacker),
    UIntVariable(UIntVariablePacker),
}

#[derive(Debug)]
pub struct NamedPacker {
    pub name: String,
    pub packer: FieldPacker,
}

impl Schema {
    pub fn load(path: &Path) -> Result<Schema> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema [{}]", path.display()))?;
        Schema::from_json(&text).with_context(|| format!("in schema [{}]", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Schema> {
        let schema = serde_json::from_str(text).context("malformed schema")?;
        Ok(schema)
    }

    /// Construct the packer of every field, in order.
    pub fn build(&self) -> Result<Vec<NamedPacker>> {
        let mut names = HashSet::new();
        let mut packers = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(anyhow!("the field `{}` is defined twice", field.name));
            }

            let packer = field
                .kind
                .build()
                .with_context(|| format!("invalid parameters for field `{}`", field.name))?;

            log::debug!("field `{}`: {:?}", field.name, packer);

            packers.push(NamedPacker {
                name: field.name.clone(),
                packer,
            });
        }

        Ok(packers)
    }
}

impl FieldKind {
    pub fn build(&self) -> packers::Result<FieldPacker> {
        let packer: FieldPacker = match *self {
            FieldKind::Float { max, precision } => FloatPacker::new(max, precision)?.into(),
            FieldKind::Vector2 { max, precision } => {
                Vector2Packer::new(Vector2::from(max), Vector2::from(precision))?.into()
            }
            FieldKind::Vector3 { max, precision } => {
                Vector3Packer::new(Vector3::from(max), Vector3::from(precision))?.into()
            }
            FieldKind::Position {
                min,
                max,
                precision,
            } => PositionPacker::new(Vector3::from(min), Vector3::from(max), precision)?.into(),
            FieldKind::Quaternion { bits_per_element } => {
                QuaternionPacker::new(bits_per_element)?.into()
            }
            FieldKind::UIntVariable {
                small,
                medium,
                large,
            } => UIntVariablePacker::new(small, medium, large)?.into(),
        };
        Ok(packer)
    }
}

impl FieldPacker {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldPacker::Float(_) => "float",
            FieldPacker::Vector2(_) => "vector2",
            FieldPacker::Vector3(_) => "vector3",
            FieldPacker::Position(_) => "position",
            FieldPacker::Quaternion(_) => "quaternion",
            FieldPacker::UIntVariable(_) => "uint_variable",
        }
    }

    pub fn max_bit_count(&self) -> u32 {
        match self {
            FieldPacker::Float(packer) => packer.max_bit_count(),
            FieldPacker::Vector2(packer) => packer.max_bit_count(),
            FieldPacker::Vector3(packer) => packer.max_bit_count(),
            FieldPacker::Position(packer) => packer.max_bit_count(),
            FieldPacker::Quaternion(packer) => packer.max_bit_count(),
            FieldPacker::UIntVariable(packer) => packer.max_bit_count(),
        }
    }

    /// Whether the number of bits written depends on the value.
    pub fn is_variable(&self) -> bool {
        match self {
            FieldPacker::UIntVariable(_) => true,
            _ => false,
        }
    }
}
