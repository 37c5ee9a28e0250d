//! Arrow-backed tabular dataset consumed by the compiler.
//!
//! A [`Dataset`] is an ordered set of named, typed columns spread over one or
//! more record batches that share a schema. The compiler only ever reads it:
//! column order, native types, the row count and per-column distinct counts.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::row::{OwnedRow, RowConverter, SortField};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use tracing::debug;

use crate::error::{LookmlError, Result};

/// An immutable tabular dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Dataset {
    /// Creates a dataset from record batches sharing `schema`.
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        for batch in &batches {
            if batch.schema().fields() != schema.fields() {
                return Err(LookmlError::Configuration(format!(
                    "Record batch schema {:?} does not match dataset schema {:?}",
                    batch.schema(),
                    schema
                )));
            }
        }
        Ok(Self { schema, batches })
    }

    /// Creates a dataset from a single batch.
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// Creates a single-batch dataset from named columns.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use arrow::array::{ArrayRef, Int64Array, StringArray};
    /// use lookml_gen::dataset::Dataset;
    ///
    /// let dataset = Dataset::from_columns(vec![
    ///     ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
    ///     ("name", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
    /// ])
    /// .unwrap();
    /// assert_eq!(dataset.num_rows(), 2);
    /// ```
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        let columns: Vec<(S, ArrayRef)> = columns.into_iter().collect();
        if columns.is_empty() {
            return Ok(Self {
                schema: Arc::new(Schema::empty()),
                batches: Vec::new(),
            });
        }
        let batch = RecordBatch::try_from_iter(columns)?;
        Ok(Self::from_batch(batch))
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total number of rows, nulls included.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Iterates over the columns in schema order.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> + '_ {
        let batches = self.batches.as_slice();
        self.schema
            .fields()
            .iter()
            .enumerate()
            .map(move |(index, field)| Column {
                field: field.as_ref(),
                index,
                batches,
            })
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.columns().find(|c| c.name() == name)
    }
}

/// A borrowed view of one dataset column across all batches.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    field: &'a Field,
    index: usize,
    batches: &'a [RecordBatch],
}

impl<'a> Column<'a> {
    pub fn name(&self) -> &'a str {
        self.field.name()
    }

    /// Native type observed for this column.
    pub fn data_type(&self) -> &'a DataType {
        self.field.data_type()
    }

    /// The column's chunks, one per batch.
    pub fn arrays(&self) -> impl Iterator<Item = &'a ArrayRef> + 'a {
        let index = self.index;
        let batches: &'a [RecordBatch] = self.batches;
        batches.iter().map(move |b| b.column(index))
    }

    pub fn len(&self) -> usize {
        self.arrays().map(|a| a.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        self.arrays().map(|a| a.null_count()).sum()
    }

    /// Number of distinct non-null values in the column.
    ///
    /// Values are compared through Arrow's row format, so equality follows the
    /// native type (`1` and `1.0` in different columns never meet here).
    /// Types the row format cannot encode are compared by their display text.
    pub fn distinct_count(&self) -> Result<usize> {
        if matches!(self.data_type(), DataType::Null) {
            return Ok(0);
        }
        let converter = match RowConverter::new(vec![SortField::new(self.data_type().clone())]) {
            Ok(converter) => converter,
            Err(e) => {
                debug!(
                    column = self.name(),
                    data_type = %self.data_type(),
                    error = %e,
                    "Row format unsupported, counting distinct display values"
                );
                return distinct_display_count(self.arrays());
            }
        };
        let mut seen: HashSet<OwnedRow> = HashSet::new();
        for array in self.arrays() {
            let rows = converter.convert_columns(std::slice::from_ref(array))?;
            for (i, row) in rows.iter().enumerate() {
                if array.is_valid(i) {
                    seen.insert(row.owned());
                }
            }
        }
        Ok(seen.len())
    }
}

/// Distinct non-null values across `arrays`, compared by their rendering.
fn distinct_display_count<'a>(arrays: impl Iterator<Item = &'a ArrayRef>) -> Result<usize> {
    let options = FormatOptions::default();
    let mut seen: HashSet<String> = HashSet::new();
    for array in arrays {
        let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
        for i in (0..array.len()).filter(|&i| array.is_valid(i)) {
            seen.insert(formatter.value(i).to_string());
        }
    }
    Ok(seen.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            (
                "id",
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])) as ArrayRef,
            ),
            (
                "city",
                Arc::new(StringArray::from(vec![
                    Some("Paris"),
                    Some("Oslo"),
                    None,
                    Some("Paris"),
                ])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_columns_keep_schema_order() {
        let ds = sample();
        assert_eq!(ds.column_names(), vec!["id", "city"]);
        assert_eq!(ds.num_rows(), 4);
        assert_eq!(ds.num_columns(), 2);
        assert!(!ds.is_empty());
    }

    #[test]
    fn test_distinct_count_ignores_nulls() {
        let ds = sample();
        assert_eq!(ds.column("id").unwrap().distinct_count().unwrap(), 4);
        let city = ds.column("city").unwrap();
        assert_eq!(city.distinct_count().unwrap(), 2);
        assert_eq!(city.null_count(), 1);
        assert_eq!(city.len(), 4);
    }

    #[test]
    fn test_display_count_matches_row_count() {
        let ds = sample();
        let id = ds.column("id").unwrap();
        assert_eq!(distinct_display_count(id.arrays()).unwrap(), 4);

        let with_nulls: ArrayRef = Arc::new(Int64Array::from(vec![Some(7), None, Some(7), Some(8)]));
        let floats: ArrayRef = Arc::new(Float64Array::from(vec![1.5, 2.0]));
        assert_eq!(distinct_display_count([&with_nulls].into_iter()).unwrap(), 2);
        assert_eq!(
            distinct_display_count([&with_nulls, &floats].into_iter()).unwrap(),
            4
        );
    }

    #[test]
    fn test_distinct_count_across_batches() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "price",
            DataType::Float64,
            true,
        )]));
        let b1 = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![1.5, 2.5]))],
        )
        .unwrap();
        let b2 = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![2.5, 3.5]))],
        )
        .unwrap();
        let ds = Dataset::try_new(schema, vec![b1, b2]).unwrap();
        assert_eq!(ds.num_rows(), 4);
        assert_eq!(ds.column("price").unwrap().distinct_count().unwrap(), 3);
    }

    #[test]
    fn test_mismatched_batch_schema_is_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, true)]));
        let other = RecordBatch::try_from_iter(vec![(
            "b",
            Arc::new(Int64Array::from(vec![1])) as ArrayRef,
        )])
        .unwrap();
        assert!(Dataset::try_new(schema, vec![other]).is_err());
    }

    #[test]
    fn test_zero_row_dataset() {
        let ds = Dataset::from_columns(vec![(
            "id",
            Arc::new(Int64Array::from(Vec::<i64>::new())) as ArrayRef,
        )])
        .unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.num_columns(), 1);
        assert_eq!(ds.column("id").unwrap().distinct_count().unwrap(), 0);
    }
}
