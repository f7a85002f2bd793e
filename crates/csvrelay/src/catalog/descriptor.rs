//! External table descriptor derived from a dataset's header
//!
//! The schema is lossy: every column is registered as `string` whatever the
//! data looks like. Readers of the catalog table cast as they need.

use crate::dataset::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const LAZY_SIMPLE_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";
pub const FIELD_DELIMITER_PARAM: &str = "field.delim";
pub const FIELD_DELIMITER: &str = ",";
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";
pub const STRING_TYPE: &str = "string";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "Type")]
    pub column_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogTableDescriptor {
    pub name: String,
    pub location: String,
    pub input_format: String,
    pub output_format: String,
    pub serialization_library: String,
    pub serde_parameters: BTreeMap<String, String>,
    pub table_type: String,
    pub columns: Vec<CatalogColumn>,
}

impl CatalogTableDescriptor {
    /// Comma-delimited plain-text external table at `location`, one string
    /// column per dataset column, in header order.
    pub fn for_dataset(dataset: &Dataset, table: &str, location: &str) -> Self {
        let columns = dataset
            .column_names()
            .map(|name| CatalogColumn {
                name: name.to_string(),
                column_type: STRING_TYPE.to_string(),
            })
            .collect();

        Self {
            name: table.to_string(),
            location: location.to_string(),
            input_format: TEXT_INPUT_FORMAT.to_string(),
            output_format: TEXT_OUTPUT_FORMAT.to_string(),
            serialization_library: LAZY_SIMPLE_SERDE.to_string(),
            serde_parameters: BTreeMap::from([(
                FIELD_DELIMITER_PARAM.to_string(),
                FIELD_DELIMITER.to_string(),
            )]),
            table_type: EXTERNAL_TABLE.to_string(),
            columns,
        }
    }
}
