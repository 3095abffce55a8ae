use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use tuplecore::common::{TableId, PAGE_SIZE, USER_DATA_TABLE_ID_START};
use tuplecore::storage::layout::SlotLayout;
use tuplecore::tuple::field::Field;
use tuplecore::tuple::schema::{TDItem, TupleDesc, Type};
use tuplecore::tuple::Tuple;

#[derive(Parser)]
#[command(about = "Inspect fixed-width row layouts and turn delimited text into tuples")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a schema together with its row and page layout
    Describe {
        #[arg(long, help = "Columns as 'name:type' pairs, e.g. 'id:int,name:string(20)'")]
        schema: String,

        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,
    },
    /// Read delimited rows and print one tuple per line
    Dump {
        #[arg(long, help = "Columns as 'name:type' pairs, e.g. 'id:int,name:string(20)'")]
        schema: String,

        #[arg(long, help = "File to read rows from, standard input if omitted")]
        input: Option<PathBuf>,

        #[arg(long, default_value_t = ',')]
        delimiter: char,

        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,

        #[arg(long, default_value_t = USER_DATA_TABLE_ID_START)]
        table_id: TableId,

        #[arg(long, help = "Prefix every tuple with the record id it would be stored at")]
        record_ids: bool,
    },
}

struct DumpOptions {
    delimiter: char,
    table_id: TableId,
    record_ids: bool,
}

/// Parses 'name:type' pairs separated by commas. A bare type declares an anonymous column.
fn parse_schema(text: &str) -> Result<TupleDesc> {
    let items = split_columns(text)?
        .into_iter()
        .map(|column| -> Result<TDItem> {
            let (name, field_type) = match column.split_once(':') {
                Some((name, field_type)) => (name.trim(), field_type),
                None => ("", column),
            };
            let field_type = field_type
                .parse::<Type>()
                .with_context(|| format!("Invalid column '{}'", column))?;
            Ok(TDItem::new(field_type, name.to_owned()))
        })
        .collect::<Result<Vec<TDItem>>>()?;
    Ok(TupleDesc::from_items(items)?)
}

/// Splits column definitions on commas. A single trailing comma is allowed.
fn split_columns(text: &str) -> Result<Vec<&str>> {
    let mut columns: Vec<&str> = text.split(',').map(str::trim).collect();
    if columns.len() > 1 && columns.last() == Some(&"") {
        columns.pop();
    }
    if let Some(position) = columns.iter().position(|column| column.is_empty()) {
        return Err(Error::msg(format!(
            "Empty column definition at position {} in '{}'",
            position + 1,
            text
        )));
    }
    Ok(columns)
}

/// Builds a tuple from one line of text. Missing or empty values leave the field unset.
fn parse_row(line: &str, delimiter: char, schema: &Arc<TupleDesc>) -> Result<Tuple> {
    let values: Vec<&str> = line.split(delimiter).collect();
    if values.len() > schema.num_fields() {
        return Err(Error::msg(format!(
            "Expected at most {} values but got {}",
            schema.num_fields(),
            values.len()
        )));
    }

    let mut tuple = Tuple::new(Arc::clone(schema))?;
    for (i, (value, item)) in values.iter().zip(schema.iter()).enumerate() {
        if value.is_empty() {
            continue;
        }
        let field = Field::parse(value, &item.field_type())
            .with_context(|| format!("Invalid value for column {} '{}'", i, item.field_name()))?;
        tuple.set_field(i, field)?;
    }
    Ok(tuple)
}

fn describe<W: Write>(writer: &mut W, schema: &TupleDesc, page_size: usize) -> Result<()> {
    let layout = SlotLayout::for_schema(schema, page_size)?;
    writeln!(writer, "schema: {}", schema)?;
    writeln!(writer, "fields: {}", schema.num_fields())?;
    writeln!(writer, "row size: {} bytes", schema.byte_size())?;
    writeln!(
        writer,
        "page: {} bytes, {} slots, {} header bytes",
        layout.page_size(),
        layout.slots_per_page(),
        layout.header_bytes()
    )?;
    Ok(())
}

/// Writes every row of `reader` as a tuple and returns how many were written.
fn dump<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    schema: Arc<TupleDesc>,
    layout: &SlotLayout,
    options: &DumpOptions,
) -> Result<usize> {
    let mut written = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let mut tuple = parse_row(line, options.delimiter, &schema)
            .with_context(|| format!("Failed to parse line {}", line_no + 1))?;
        tuple.set_record_id(layout.record_id(options.table_id, written));
        if !tuple.is_complete() {
            debug!("Line {} leaves some fields unset", line_no + 1);
        }

        if options.record_ids {
            if let Some(record_id) = tuple.record_id() {
                write!(writer, "{}\t", record_id)?;
            }
        }
        write!(writer, "{}", tuple)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match cli.command {
        Command::Describe { schema, page_size } => {
            let schema = parse_schema(&schema)?;
            describe(&mut writer, &schema, page_size)?;
            writer.flush()?;
        }
        Command::Dump {
            schema,
            input,
            delimiter,
            page_size,
            table_id,
            record_ids,
        } => {
            let schema = Arc::new(parse_schema(&schema)?);
            let layout = SlotLayout::for_schema(&schema, page_size)?;
            let options = DumpOptions {
                delimiter,
                table_id,
                record_ids,
            };
            let written = match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    dump(BufReader::new(file), &mut writer, schema, &layout, &options)?
                }
                None => dump(io::stdin().lock(), &mut writer, schema, &layout, &options)?,
            };
            info!("Dumped {} tuples", written);
        }
    }

    Ok(())
}
