//! Typed rows extracted from the loaded tables.

use crate::data::LoaderError;
use polars::prelude::*;
use serde::Serialize;

/// One administrative province.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceRecord {
    pub province_name: Option<String>,
    pub island: Option<String>,
    pub population: Option<i64>,
    pub population_kmsquare: Option<f64>,
    pub confirmed: Option<i64>,
    pub deceased: Option<i64>,
    pub released: Option<i64>,
    pub capital_city: Option<String>,
}

/// One calendar day of national counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub date: String,
    pub acc_confirmed: Option<i64>,
    pub new_confirmed: Option<i64>,
    pub new_released: Option<i64>,
    pub new_deceased: Option<i64>,
    pub new_tested: Option<i64>,
    pub being_checked: Option<i64>,
}

impl ProvinceRecord {
    /// Build records from a cleaned province table.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError> {
        let names = str_values(df, "province_name")?;
        let islands = str_values(df, "island")?;
        let population = i64_values(df, "population")?;
        let density = f64_values(df, "population_kmsquare")?;
        let confirmed = i64_values(df, "confirmed")?;
        let deceased = i64_values(df, "deceased")?;
        let released = i64_values(df, "released")?;
        let capitals = str_values(df, "capital_city")?;

        let records = (0..df.height())
            .map(|i| ProvinceRecord {
                province_name: names[i].clone(),
                island: islands[i].clone(),
                population: population[i],
                population_kmsquare: density[i],
                confirmed: confirmed[i],
                deceased: deceased[i],
                released: released[i],
                capital_city: capitals[i].clone(),
            })
            .collect();

        Ok(records)
    }
}

impl CaseRecord {
    /// Build records from the daily case table, keeping source row order.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, LoaderError> {
        let dates = str_values(df, "date")?;
        let acc_confirmed = i64_values(df, "acc_confirmed")?;
        let new_confirmed = i64_values(df, "new_confirmed")?;
        let new_released = i64_values(df, "new_released")?;
        let new_deceased = i64_values(df, "new_deceased")?;
        let new_tested = i64_values(df, "new_tested")?;
        let being_checked = i64_values(df, "being_checked")?;

        let records = (0..df.height())
            .map(|i| CaseRecord {
                date: dates[i].clone().unwrap_or_default(),
                acc_confirmed: acc_confirmed[i],
                new_confirmed: new_confirmed[i],
                new_released: new_released[i],
                new_deceased: new_deceased[i],
                new_tested: new_tested[i],
                being_checked: being_checked[i],
            })
            .collect();

        Ok(records)
    }
}

/// Cast a column, failing if the cast turned any present value into null.
fn cast_checked(
    df: &DataFrame,
    name: &str,
    dtype: &DataType,
    expected: &'static str,
) -> Result<Column, LoaderError> {
    let column = df.column(name)?;
    let cast = column.cast(dtype)?;
    if cast.null_count() > column.null_count() {
        return Err(LoaderError::ColumnType {
            column: name.to_string(),
            expected,
        });
    }
    Ok(cast)
}

fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let column = cast_checked(df, name, &DataType::String, "text")?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect();
    Ok(values)
}

fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, LoaderError> {
    let column = cast_checked(df, name, &DataType::Int64, "integers")?;
    let values = column.i64()?.into_iter().collect();
    Ok(values)
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let column = cast_checked(df, name, &DataType::Float64, "numbers")?;
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn province_frame() -> DataFrame {
        df!(
            "province_name" => ["Aceh", "Bali"],
            "island" => ["Sumatera", "Nusa Tenggara"],
            "population" => [5_189_466i64, 4_246_528],
            "population_kmsquare" => [90.4f64, 734.6],
            "confirmed" => [5i64, 81],
            "deceased" => [1i64, 2],
            "released" => [2i64, 23],
            "capital_city" => ["Banda Aceh", "Denpasar"]
        )
        .unwrap()
    }

    #[test]
    fn province_rows_are_typed() {
        let records = ProvinceRecord::from_frame(&province_frame()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].province_name.as_deref(), Some("Bali"));
        assert_eq!(records[1].confirmed, Some(81));
        assert_eq!(records[0].population_kmsquare, Some(90.4));
    }

    #[test]
    fn nulls_are_carried_as_none() {
        let df = df!(
            "date" => ["2020-03-02", "2020-03-03"],
            "acc_confirmed" => [Some(2i64), None],
            "new_confirmed" => [2i64, 0],
            "new_released" => [0i64, 0],
            "new_deceased" => [0i64, 0],
            "new_tested" => [0i64, 10],
            "being_checked" => [0i64, 5]
        )
        .unwrap();
        let records = CaseRecord::from_frame(&df).unwrap();
        assert_eq!(records[0].acc_confirmed, Some(2));
        assert_eq!(records[1].acc_confirmed, None);
        assert_eq!(records[1].date, "2020-03-03");
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let mut df = province_frame();
        df.with_column(Column::new("population".into(), ["many", "few"]))
            .unwrap();
        let err = ProvinceRecord::from_frame(&df).unwrap_err();
        assert!(matches!(err, LoaderError::ColumnType { ref column, .. } if column == "population"));
    }
}
