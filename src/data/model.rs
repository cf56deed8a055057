use std::fmt;

use chrono::NaiveDate;

/// Column names every sales dataset must carry (case-sensitive).
pub const DATE_COLUMN: &str = "Date";
pub const CATEGORY_COLUMN: &str = "Category";
pub const REGION_COLUMN: &str = "Region";
pub const TOTAL_SALE_COLUMN: &str = "Total Sale";

/// Output format for [`CellValue::Date`] in the grid and in exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the sales table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a sort key by the grid, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so floats can take part in sorting --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                Date(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns compare by value, integers first on ties.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            (Date(a), Date(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Type a raw text cell: empty → `Null`, then integer, float, bool,
    /// `YYYY-MM-DD` date, falling back to a string.
    ///
    /// Every loader types its text cells through here, so a cell reads back
    /// the same from CSV, JSON and Parquet.
    pub fn infer(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return CellValue::Date(d);
        }
        CellValue::String(s.to_string())
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Canonical text written to CSV. [`CellValue::infer`] maps it back to
    /// the same value.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Float(v) => {
                // `{}` on f64 is the shortest representation that round-trips,
                // but integral floats must keep a fraction to stay floats.
                let s = v.to_string();
                if v.is_finite() && !s.contains(['.', 'e', 'E']) {
                    format!("{s}.0")
                } else {
                    s
                }
            }
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SaleRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single sale (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub category: String,
    pub region: String,
    pub total_sale: f64,
    /// Every column of the row in header order, required ones included.
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Positions of the required columns inside [`SalesTable::columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub date: usize,
    pub category: usize,
    pub region: usize,
    pub total_sale: usize,
}

impl RequiredColumns {
    /// Locate the required columns in a header row, reporting the first one missing.
    pub fn locate(columns: &[String]) -> Result<Self, &'static str> {
        let find = |name: &'static str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or(name)
        };
        Ok(RequiredColumns {
            date: find(DATE_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            region: find(REGION_COLUMN)?,
            total_sale: find(TOTAL_SALE_COLUMN)?,
        })
    }
}

/// A table of sales; the full dataset and every filtered view share this type.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    /// Column names in header order.
    pub columns: Vec<String>,
    pub required: RequiredColumns,
    pub records: Vec<SaleRecord>,
}

impl SalesTable {
    pub fn new(columns: Vec<String>, required: RequiredColumns, records: Vec<SaleRecord>) -> Self {
        SalesTable {
            columns,
            required,
            records,
        }
    }

    /// A table with the same columns holding the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> SalesTable {
        SalesTable {
            columns: self.columns.clone(),
            required: self.required,
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
