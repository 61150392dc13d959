#![forbid(unsafe_code)]

use sf_diag::DiagHandle;
use sf_frame::DataFrame;
use sf_io::CsvReader;
use sf_series::{FloatSeries, IntSeries};
use sf_types::DType;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut headers_present = true;
    let mut promotions: Vec<(String, DType)> = Vec::new();
    let mut path: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-headers" => {
                headers_present = false;
            }
            "--parse" => {
                let value = args
                    .next()
                    .ok_or("--parse requires <column>:<type> (e.g. score:float)")?;
                promotions.push(parse_promotion(&value)?);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other if path.is_none() => {
                path = Some(other.to_owned());
            }
            other => {
                return Err(format!("unknown argument: {other}").into());
            }
        }
    }

    let path = path.ok_or("missing input file; see --help")?;

    let reader = CsvReader::new(headers_present).with_diagnostics(DiagHandle::log());
    let mut frame = reader.read_path(&path)?;
    log::debug!("loaded {} columns from {path}", frame.column_count());

    for (name, dtype) in promotions {
        frame = promote(&frame, &name, dtype)?;
    }

    println!("file={path} columns={} rows={}", frame.column_count(), frame.row_count());
    for column in frame.columns() {
        match column.dtype() {
            DType::String => {
                let series = frame.string_column(column.name())?;
                println!(
                    "column={} dtype={} rows={}",
                    column.name(),
                    column.dtype(),
                    series.len()
                );
            }
            DType::Int => {
                let series = frame.int_column(column.name())?;
                print_numeric_summary(column.name(), "Integer", &series);
            }
            DType::Float => {
                let series = frame.float_column(column.name())?;
                println!(
                    "column={} dtype=Float rows={} min={} max={} avg={}",
                    column.name(),
                    series.len(),
                    series.min().map_or(f64::NAN, |(_, v)| v),
                    series.max().map_or(f64::NAN, |(_, v)| v),
                    series.avg()
                );
            }
        }
    }

    Ok(())
}

fn print_numeric_summary(name: &str, dtype: &str, series: &IntSeries) {
    match (series.min(), series.max(), series.avg()) {
        (Some((_, min)), Some((_, max)), Ok(avg)) => {
            println!(
                "column={name} dtype={dtype} rows={} min={min} max={max} avg={avg}",
                series.len()
            );
        }
        _ => {
            println!("column={name} dtype={dtype} rows=0");
        }
    }
}

fn parse_promotion(value: &str) -> Result<(String, DType), Box<dyn std::error::Error>> {
    let (name, tag) = value
        .split_once(':')
        .ok_or_else(|| format!("--parse expects <column>:<type>, got {value}"))?;
    Ok((name.to_owned(), DType::parse(tag)?))
}

/// Re-type a string column in place: parse every cell, then swap the
/// column for the typed series through the frame's own drop/set path.
fn promote(
    frame: &DataFrame,
    name: &str,
    dtype: DType,
) -> Result<DataFrame, Box<dyn std::error::Error>> {
    let source = frame.string_column(name)?;
    match dtype {
        DType::String => Ok(frame.clone()),
        DType::Int => {
            let mut values = Vec::with_capacity(source.len());
            for cell in source.values() {
                values.push(cell.trim().parse::<i64>()?);
            }
            Ok(frame
                .drop_column(name)
                .set_int_column(name, IntSeries::from_values(values))?)
        }
        DType::Float => {
            let mut values = Vec::with_capacity(source.len());
            for cell in source.values() {
                values.push(cell.trim().parse::<f64>()?);
            }
            Ok(frame
                .drop_column(name)
                .set_float_column(name, FloatSeries::from_values(values))?)
        }
    }
}

fn print_help() {
    println!(
        "csv-inspect\n\
         Usage:\n\
         \tcsv-inspect [--no-headers] [--parse <column>:<type>] <file.csv>\n\
         Options:\n\
         \t--no-headers         Treat the first row as data; names become Column <index>\n\
         \t--parse <col>:<ty>   Re-type a column before summarizing (ty: string|int|float)\n\
         \t-h, --help           Show this help"
    );
}
