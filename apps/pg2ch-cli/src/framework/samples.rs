//! Built-in sample DDL, shown by `pg2ch examples`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub ddl: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "Simple Users Table",
        description: "Basic user table with common data types",
        ddl: "CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) UNIQUE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);",
    },
    Sample {
        name: "E-commerce Products",
        description: "Product catalog with various data types",
        ddl: "CREATE TABLE products (
    product_id BIGSERIAL PRIMARY KEY,
    name VARCHAR(500) NOT NULL,
    description TEXT,
    price DECIMAL(10,2) NOT NULL,
    category_id INTEGER,
    in_stock BOOLEAN DEFAULT true,
    tags JSONB,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
);",
    },
    Sample {
        name: "Financial Transactions",
        description: "Complex table with constraints and defaults",
        ddl: "CREATE TABLE IF NOT EXISTS public.transactions (
    transaction_id BIGSERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL,
    amount DECIMAL(15,2) NOT NULL,
    currency CHAR(3) DEFAULT 'USD',
    status VARCHAR(20) DEFAULT 'pending' CHECK (status IN ('pending', 'completed', 'failed')),
    created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
);",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::conversion::{convert_ddl, ConversionOptions};

    #[test]
    fn test_every_sample_converts() {
        for sample in SAMPLES {
            let conversion = convert_ddl(sample.ddl, &ConversionOptions::default())
                .unwrap_or_else(|e| panic!("{} failed: {e}", sample.name));
            assert_eq!(conversion.tables.len(), 1);
            assert!(conversion.ddl.contains("ENGINE = MergeTree()"));
        }
    }

    #[test]
    fn test_products_sample() {
        let conversion = convert_ddl(SAMPLES[1].ddl, &ConversionOptions::default()).unwrap();
        let expected = "CREATE TABLE products
(
    product_id UInt64,
    name String,
    description Nullable(String),
    price Decimal(10,2),
    category_id Nullable(Int32),
    in_stock Bool DEFAULT true,
    tags Nullable(String),
    created_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY (product_id);";
        assert_eq!(conversion.ddl, expected);
    }
}
