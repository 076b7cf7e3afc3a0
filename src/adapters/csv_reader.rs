use crate::domain::model::{OptionalColumn, Transaction, TransactionTable, REQUIRED_COLUMNS};
use crate::utils::error::{AnalysisError, Result};
use csv::{ReaderBuilder, Trim};

/// Parses an uploaded CSV into a transaction table.
///
/// Header names are trimmed and matched exactly. `date`, `revenue` and
/// `expense` must be present; any other recognised header marks its optional
/// column as present. Unknown headers are ignored.
pub fn read_transactions(data: &[u8]) -> Result<TransactionTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        tracing::debug!("Rejecting CSV, headers were: {:?}", headers);
        return Err(AnalysisError::MissingColumns { missing });
    }

    let columns: Vec<OptionalColumn> = headers
        .iter()
        .filter_map(OptionalColumn::from_header)
        .collect();

    let rows = reader
        .deserialize::<Transaction>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    tracing::debug!(
        "Parsed {} rows with optional columns {:?}",
        rows.len(),
        columns.iter().map(|c| c.header()).collect::<Vec<_>>()
    );

    Ok(TransactionTable::new(rows, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_required_columns_only() {
        let csv = "date,revenue,expense\n2024-01-31,1000,800\n2024-02-29,1200.50,900\n";
        let table = read_transactions(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].revenue, 1200.5);
        assert_eq!(table.columns().count(), 0);
        assert!(!table.has(OptionalColumn::EmiAmount));
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let csv = "date,revenue\n2024-01-31,1000\n";
        match read_transactions(csv.as_bytes()) {
            Err(AnalysisError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["expense".to_string()])
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(
            read_transactions(b""),
            Err(AnalysisError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_optional_columns_and_empty_cells() {
        let csv = "\
date, revenue ,expense,type,amount,emi_amount,industry,notes
2024-01-31,1000,800,receivable,250,,Retail,first
2024-02-29,1100,850,payable,,40,,second
";
        let table = read_transactions(csv.as_bytes()).unwrap();

        assert!(table.has(OptionalColumn::EntryType));
        assert!(table.has(OptionalColumn::Amount));
        assert!(table.has(OptionalColumn::EmiAmount));
        assert!(table.has(OptionalColumn::Industry));
        assert!(!table.has(OptionalColumn::GstPaid));

        let first = &table.rows()[0];
        assert_eq!(first.entry_type.as_deref(), Some("receivable"));
        assert_eq!(first.amount, Some(250.0));
        assert_eq!(first.emi_amount, None);
        assert_eq!(first.industry.as_deref(), Some("Retail"));

        let second = &table.rows()[1];
        assert_eq!(second.amount, None);
        assert_eq!(second.emi_amount, Some(40.0));
        assert_eq!(second.industry, None);
    }

    #[test]
    fn test_non_numeric_revenue_is_csv_error() {
        let csv = "date,revenue,expense\n2024-01-31,lots,800\n";
        assert!(matches!(
            read_transactions(csv.as_bytes()),
            Err(AnalysisError::CsvError(_))
        ));
    }

    #[test]
    fn test_header_only_file_gives_empty_table() {
        let table = read_transactions(b"date,revenue,expense\n").unwrap();
        assert!(table.is_empty());
    }
}
