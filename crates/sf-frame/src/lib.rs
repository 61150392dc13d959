#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sf_diag::DiagHandle;
use sf_series::{FloatSeries, IntSeries, SeriesError, StringSeries};
use sf_types::{DType, TypeParseError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("duplicate {what}: {value}")]
    Duplicate { what: String, value: String },
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },
    #[error("column {column} already exists with type {existing}, not {requested}")]
    TypeConflict {
        column: String,
        existing: DType,
        requested: DType,
    },
    #[error(transparent)]
    UnknownType(#[from] TypeParseError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// A (name, type) pair identifying a column without holding its data.
/// Names are case-sensitive and unique within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: DType,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, dtype: DType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }

    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, DType::String)
    }

    #[must_use]
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, DType::Int)
    }

    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, DType::Float)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }
}

/// An ordered set of uniquely named columns, each backed by exactly one
/// typed series. A frame is an immutable snapshot: every mutating
/// operation clones the receiver and returns the changed copy, so prior
/// values stay valid and share no storage with the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    columns: BTreeMap<String, Column>,
    string_columns: BTreeMap<String, StringSeries>,
    int_columns: BTreeMap<String, IntSeries>,
    float_columns: BTreeMap<String, FloatSeries>,
    #[serde(skip)]
    diag: DiagHandle,
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.string_columns == other.string_columns
            && self.int_columns == other.int_columns
            && self.float_columns == other.float_columns
    }
}

impl DataFrame {
    /// Build a frame whose declared columns start as empty series of their
    /// type. Any shared name fails with [`FrameError::Duplicate`] and no
    /// frame is produced.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Result<Self, FrameError> {
        Self::with_diagnostics(columns, DiagHandle::default())
    }

    /// Like [`DataFrame::new`] with an injected diagnostics sink. The sink
    /// receives a copy of every operational error; the returned `Result`
    /// stays authoritative.
    pub fn with_diagnostics(
        columns: impl IntoIterator<Item = Column>,
        diag: DiagHandle,
    ) -> Result<Self, FrameError> {
        let mut frame = Self {
            diag,
            ..Self::default()
        };

        for column in columns {
            if frame.columns.contains_key(column.name()) {
                let err = FrameError::Duplicate {
                    what: "column".to_owned(),
                    value: column.name().to_owned(),
                };
                frame.diag.error(&err.to_string());
                return Err(err);
            }

            let name = column.name().to_owned();
            match column.dtype() {
                DType::String => {
                    frame.string_columns.insert(name.clone(), StringSeries::new());
                }
                DType::Int => {
                    frame.int_columns.insert(name.clone(), IntSeries::new());
                }
                DType::Float => {
                    frame.float_columns.insert(name.clone(), FloatSeries::new());
                }
            }
            frame.columns.insert(name, column);
        }

        Ok(frame)
    }

    /// Snapshot of the column descriptors, name-ordered.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.columns.values().cloned().collect()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Largest series length across all columns. Columns are not required
    /// to share a length, so this is an upper bound on the addressable row
    /// ordinal.
    #[must_use]
    pub fn row_count(&self) -> usize {
        let strings = self.string_columns.values().map(|s| s.len());
        let ints = self.int_columns.values().map(|s| s.len());
        let floats = self.float_columns.values().map(|s| s.len());
        strings.chain(ints).chain(floats).max().unwrap_or(0)
    }

    /// Independent copy of the string series behind `name`. A name that is
    /// absent, or present under another type, is [`FrameError::UnknownColumn`].
    pub fn string_column(&self, name: &str) -> Result<StringSeries, FrameError> {
        match self.string_columns.get(name) {
            Some(series) => Ok(series.clone()),
            None => Err(self.unknown_column(name, DType::String)),
        }
    }

    pub fn int_column(&self, name: &str) -> Result<IntSeries, FrameError> {
        match self.int_columns.get(name) {
            Some(series) => Ok(series.clone()),
            None => Err(self.unknown_column(name, DType::Int)),
        }
    }

    pub fn float_column(&self, name: &str) -> Result<FloatSeries, FrameError> {
        match self.float_columns.get(name) {
            Some(series) => Ok(series.clone()),
            None => Err(self.unknown_column(name, DType::Float)),
        }
    }

    fn unknown_column(&self, name: &str, requested: DType) -> FrameError {
        if let Some(column) = self.columns.get(name) {
            // A descriptor whose typed series is missing means the frame's
            // internal consistency is broken, not that the caller erred.
            assert!(
                column.dtype() != requested,
                "column {name} is declared {requested} but has no backing series"
            );
        }
        let err = FrameError::UnknownColumn {
            name: name.to_owned(),
        };
        self.diag.error(&err.to_string());
        err
    }

    /// A new frame in which `name` maps to `series` as a string column.
    /// The column is created if absent; a name held by another type fails
    /// with [`FrameError::TypeConflict`]. The receiver is never changed.
    pub fn set_string_column(
        &self,
        name: impl Into<String>,
        series: StringSeries,
    ) -> Result<Self, FrameError> {
        let name = name.into();
        let mut changed = self.clone();
        changed.check_settable(&name, DType::String)?;
        changed
            .columns
            .entry(name.clone())
            .or_insert_with(|| Column::string(name.clone()));
        changed.string_columns.insert(name, series);
        Ok(changed)
    }

    pub fn set_int_column(
        &self,
        name: impl Into<String>,
        series: IntSeries,
    ) -> Result<Self, FrameError> {
        let name = name.into();
        let mut changed = self.clone();
        changed.check_settable(&name, DType::Int)?;
        changed
            .columns
            .entry(name.clone())
            .or_insert_with(|| Column::int(name.clone()));
        changed.int_columns.insert(name, series);
        Ok(changed)
    }

    pub fn set_float_column(
        &self,
        name: impl Into<String>,
        series: FloatSeries,
    ) -> Result<Self, FrameError> {
        let name = name.into();
        let mut changed = self.clone();
        changed.check_settable(&name, DType::Float)?;
        changed
            .columns
            .entry(name.clone())
            .or_insert_with(|| Column::float(name.clone()));
        changed.float_columns.insert(name, series);
        Ok(changed)
    }

    fn check_settable(&self, name: &str, requested: DType) -> Result<(), FrameError> {
        match self.columns.get(name) {
            Some(column) if column.dtype() != requested => {
                let err = FrameError::TypeConflict {
                    column: name.to_owned(),
                    existing: column.dtype(),
                    requested,
                };
                self.diag.warn(&err.to_string());
                Err(err)
            }
            _ => Ok(()),
        }
    }

    /// A new frame without `name`. Dropping an absent name is a no-op.
    #[must_use]
    pub fn drop_column(&self, name: &str) -> Self {
        let mut changed = self.clone();
        changed.columns.remove(name);

        // The name can live in at most one of the typed maps.
        changed.string_columns.remove(name);
        changed.int_columns.remove(name);
        changed.float_columns.remove(name);

        changed
    }
}
