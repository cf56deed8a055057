use std::path::PathBuf;

use clap::Parser;

/// Dataset opened when no `--data` is given.
pub const DEFAULT_DATA_PATH: &str = "data/ecommerce_sales_data.csv";

#[derive(Debug, Parser)]
#[command(name = "sales-dashboard")]
#[command(about = "Interactive e-commerce sales dashboard")]
#[command(version)]
pub struct Cli {
    /// Sales dataset to load at startup (.csv, .json or .parquet)
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Rows per page in the sales grid
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["sales-dashboard"]).expect("parse");
        assert_eq!(cli.data, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(cli.page_size, 20);
    }

    #[test]
    fn explicit_options() {
        let cli = Cli::try_parse_from(["sales-dashboard", "--data", "q3.parquet", "--page-size", "50"])
            .expect("parse");
        assert_eq!(cli.data, PathBuf::from("q3.parquet"));
        assert_eq!(cli.page_size, 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["sales-dashboard", "--page-size", "0"]).is_err());
    }
}
