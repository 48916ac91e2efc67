//! Family and genus dimension tables with dense surrogate keys.
//!
//! Keys are ranks by first occurrence in the joined language table: the
//! first distinct family seen gets ID 1, the next new one ID 2, and so on.
//! A genus is identified by its `(genus, family)` pair, so one genus name
//! under two families yields two genus rows. Null names are ordinary
//! categories and receive IDs like any other value.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{LangbaseError, Result};
use crate::schema::output::{FAMILY_ID, FAMILY_NAME, GENUS_ID, GENUS_NAME};
use crate::table::{Row, Table};

/// One row of the Families table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Family {
    pub id: usize,
    pub name: Option<String>,
}

/// One row of the Genera table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genus {
    pub id: usize,
    pub name: Option<String>,
    pub family_name: Option<String>,
    pub family_id: usize,
}

type GenusKey = (Option<String>, Option<String>);

/// Distinct families and genera of a joined table.
#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    families: IndexSet<Option<String>>,
    genera: IndexSet<GenusKey>,
    /// Family ID of each genus, parallel to `genera`.
    genus_family_ids: Vec<usize>,
}

impl Dimensions {
    /// Collect families and genera from `table`'s `Family_Name` and
    /// `Genus_Name` columns.
    pub fn extract(table: &Table) -> Result<Self> {
        table.require_columns(&[FAMILY_NAME, GENUS_NAME])?;

        let mut families = IndexSet::new();
        let mut genera = IndexSet::new();
        for row in &table.rows {
            let (genus, family) = names(row);
            families.insert(family.clone());
            genera.insert((genus, family));
        }

        let mut dimensions = Self {
            families,
            genera,
            genus_family_ids: Vec::new(),
        };
        dimensions.genus_family_ids = dimensions
            .genera
            .iter()
            .map(|(_, family)| dimensions.require_family_id(family.as_deref()))
            .collect::<Result<_>>()?;

        tracing::info!(
            families = dimensions.family_count(),
            genera = dimensions.genus_count(),
            "extracted dimensions"
        );
        Ok(dimensions)
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn genus_count(&self) -> usize {
        self.genera.len()
    }

    /// Surrogate key of a family name.
    pub fn family_id(&self, name: Option<&str>) -> Option<usize> {
        self.families
            .get_index_of(&name.map(str::to_string))
            .map(|i| i + 1)
    }

    /// Surrogate key of a `(genus, family)` pair.
    pub fn genus_id(&self, genus: Option<&str>, family: Option<&str>) -> Option<usize> {
        let key = (genus.map(str::to_string), family.map(str::to_string));
        self.genera.get_index_of(&key).map(|i| i + 1)
    }

    /// Families in ID order.
    pub fn families(&self) -> Vec<Family> {
        self.families
            .iter()
            .enumerate()
            .map(|(i, name)| Family {
                id: i + 1,
                name: name.clone(),
            })
            .collect()
    }

    /// Genera in ID order.
    pub fn genera(&self) -> Vec<Genus> {
        self.genera
            .iter()
            .zip(&self.genus_family_ids)
            .enumerate()
            .map(|(i, ((name, family_name), family_id))| Genus {
                id: i + 1,
                name: name.clone(),
                family_name: family_name.clone(),
                family_id: *family_id,
            })
            .collect()
    }

    /// The Families table: `Family_ID, Family_Name`.
    pub fn families_table(&self) -> Table {
        let values = self
            .families()
            .into_iter()
            .map(|f| vec![Some(f.id.to_string()), f.name])
            .collect();
        Table::from_values("families", [FAMILY_ID, FAMILY_NAME], values)
    }

    /// The Genera table: `Genus_ID, Genus_Name, Family_ID, Family_Name`.
    pub fn genera_table(&self) -> Table {
        let values = self
            .genera()
            .into_iter()
            .map(|g| {
                vec![
                    Some(g.id.to_string()),
                    g.name,
                    Some(g.family_id.to_string()),
                    g.family_name,
                ]
            })
            .collect();
        Table::from_values("genera", [GENUS_ID, GENUS_NAME, FAMILY_ID, FAMILY_NAME], values)
    }

    /// Add `Family_ID` and `Genus_ID` columns to every row of `table`.
    pub fn attach(&self, table: &mut Table) -> Result<()> {
        table.require_columns(&[FAMILY_NAME, GENUS_NAME])?;

        let mut ids = Vec::with_capacity(table.row_count());
        for row in &table.rows {
            let (genus, family) = names(row);
            let family_id = self.require_family_id(family.as_deref())?;
            let genus_id = self
                .genus_id(genus.as_deref(), family.as_deref())
                .ok_or_else(|| LangbaseError::UnresolvedDimension {
                    dimension: "genus".to_string(),
                    name: format!(
                        "{} ({})",
                        genus.as_deref().unwrap_or(""),
                        family.as_deref().unwrap_or("")
                    ),
                })?;
            ids.push((family_id, genus_id));
        }

        let mut family_ids = ids.iter().map(|(f, _)| Some(f.to_string()));
        table.add_column(FAMILY_ID, |_| family_ids.next().flatten());
        let mut genus_ids = ids.iter().map(|(_, g)| Some(g.to_string()));
        table.add_column(GENUS_ID, |_| genus_ids.next().flatten());
        Ok(())
    }

    fn require_family_id(&self, name: Option<&str>) -> Result<usize> {
        self.family_id(name)
            .ok_or_else(|| LangbaseError::UnresolvedDimension {
                dimension: "family".to_string(),
                name: name.unwrap_or("").to_string(),
            })
    }
}

fn names(row: &Row) -> GenusKey {
    let genus = row.get(GENUS_NAME).cloned().flatten();
    let family = row.get(FAMILY_NAME).cloned().flatten();
    (genus, family)
}
