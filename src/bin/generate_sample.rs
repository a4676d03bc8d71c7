use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "dados-vendas-chocolate.csv";
const PARQUET_PATH: &str = "dados-vendas-chocolate.parquet";

/// (country, demand multiplier)
const COUNTRIES: [(&str, f64); 6] = [
    ("Australia", 0.9),
    ("UK", 1.1),
    ("India", 0.7),
    ("USA", 1.4),
    ("Canada", 0.8),
    ("New Zealand", 0.5),
];

/// (product, price per box)
const PRODUCTS: [(&str, f64); 4] = [
    ("Chocolate Amargo", 42.0),
    ("Chocolate Ao Leite", 35.0),
    ("Chocolate Branco", 38.0),
    ("Chocolate Meio Amargo", 40.0),
];

const YEARS: [i32; 3] = [2022, 2023, 2024];
const SALES_PER_MONTH: usize = 12;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

struct Sale {
    date: NaiveDate,
    country: &'static str,
    product: &'static str,
    value: f64,
    boxes: i64,
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).map_or(28, |d| d.day())
}

fn generate_sales(rng: &mut SimpleRng) -> Vec<Sale> {
    let mut sales = Vec::new();
    for &year in &YEARS {
        for month in 1..=12u32 {
            // Mild seasonality: more chocolate towards the end of the year.
            let season = 1.0 + 0.4 * (month as f64 / 12.0);
            for _ in 0..SALES_PER_MONTH {
                let (country, demand) = COUNTRIES[rng.below(COUNTRIES.len())];
                let (product, price) = PRODUCTS[rng.below(PRODUCTS.len())];
                let day = 1 + rng.below(days_in_month(year, month) as usize) as u32;
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };

                let boxes = (50.0 + rng.next_f64() * 450.0 * demand * season).round() as i64;
                let unit_price = price * (0.9 + rng.next_f64() * 0.2);
                let value = (boxes as f64 * unit_price * 100.0).round() / 100.0;

                sales.push(Sale {
                    date,
                    country,
                    product,
                    value,
                    boxes,
                });
            }
        }
    }
    sales
}

fn write_csv(sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV")?;
    writer.write_record(["Data", "Ano", "Mes", "País", "Produto", "Valor", "Caixas Enviadas"])?;
    for s in sales {
        writer.write_record([
            s.date.format("%Y-%m-%d").to_string(),
            s.date.year().to_string(),
            s.date.month().to_string(),
            s.country.to_string(),
            s.product.to_string(),
            format!("{:.2}", s.value),
            s.boxes.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(sales: &[Sale]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("Data", DataType::Date32, false),
        Field::new("Ano", DataType::Int32, false),
        Field::new("Mes", DataType::Int32, false),
        Field::new("País", DataType::Utf8, false),
        Field::new("Produto", DataType::Utf8, false),
        Field::new("Valor", DataType::Float64, false),
        Field::new("Caixas Enviadas", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from_iter_values(
                sales.iter().map(|s| (s.date - epoch).num_days() as i32),
            )),
            Arc::new(Int32Array::from_iter_values(sales.iter().map(|s| s.date.year()))),
            Arc::new(Int32Array::from_iter_values(
                sales.iter().map(|s| s.date.month() as i32),
            )),
            Arc::new(StringArray::from_iter_values(sales.iter().map(|s| s.country))),
            Arc::new(StringArray::from_iter_values(sales.iter().map(|s| s.product))),
            Arc::new(Float64Array::from_iter_values(sales.iter().map(|s| s.value))),
            Arc::new(Int64Array::from_iter_values(sales.iter().map(|s| s.boxes))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let sales = generate_sales(&mut rng);

    write_csv(&sales)?;
    write_parquet(&sales)?;

    println!(
        "Wrote {} sales to {CSV_PATH} and {PARQUET_PATH}",
        sales.len()
    );
    Ok(())
}
