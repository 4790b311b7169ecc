//! Command line front end for the checkout core.
//!
//! # Usage
//!
//! ```bash
//! # Detect candidate brands for a (partial) card number
//! checkout-cli detect 5555 5555
//!
//! # Validate a card number
//! checkout-cli validate 4111111111111111
//!
//! # Validate an expiry date against a fixed day
//! checkout-cli expiry 12/27 --reference 2025-06-01
//!
//! # Validate a security code for a brand
//! checkout-cli cvc 1234 --brand amex
//!
//! # Validate a BLIK code
//! checkout-cli blik 777123
//! ```
//!
//! Supported brands and CVC visibility come from `--config <file.json>`.
//! Set `RUST_LOG=debug` for logs on stderr.

use chrono::NaiveDate;
use checkout_core::cvc::{expected_length, validate_security_code};
use checkout_core::detect::{detect_locally, local_card_type};
use checkout_core::expiry::{parse_expiry_date, validate_expiry_date, validate_expiry_date_today};
use checkout_core::mask::mask_card_number;
use checkout_core::state::blik::{self, BlikIntent};
use checkout_core::validate::validate_card_number_for_brand;
use checkout_core::{CardBrand, CheckoutConfiguration, DetectedCardType, FieldPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(author, version, about = "Card detection and validation for checkout")]
struct Cli {
    /// JSON checkout configuration
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect candidate brands from a (partial) card number
    Detect {
        /// Card number, spaces and dashes allowed
        card_number: String,
    },

    /// Validate a card number
    Validate {
        /// Card number, spaces and dashes allowed
        card_number: String,

        /// Skip the Luhn checksum
        #[arg(long)]
        no_luhn: bool,
    },

    /// Validate an expiry date
    Expiry {
        /// Expiry date (MM/YY, MM/YYYY, MMYY)
        date: String,

        /// Day to validate against (YYYY-MM-DD), today by default
        #[arg(short, long)]
        reference: Option<String>,

        /// The expiry date may be left empty
        #[arg(long)]
        optional: bool,
    },

    /// Validate a security code
    Cvc {
        /// Security code
        code: String,

        /// Card brand txVariant, e.g. `amex`
        #[arg(short, long)]
        brand: Option<String>,
    },

    /// Validate a BLIK code
    Blik {
        /// Six digit code
        code: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkout_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match CheckoutConfiguration::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Failed to load configuration");
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
        None => CheckoutConfiguration::new(""),
    };
    debug!(
        supported_brands = config.supported_brands.len(),
        "Configuration loaded"
    );

    let valid = match cli.command {
        Commands::Detect { card_number } => cmd_detect(&card_number, &config, cli.output),
        Commands::Validate {
            card_number,
            no_luhn,
        } => cmd_validate(&card_number, !no_luhn, &config, cli.output),
        Commands::Expiry {
            date,
            reference,
            optional,
        } => cmd_expiry(&date, reference.as_deref(), optional, cli.output),
        Commands::Cvc { code, brand } => cmd_cvc(&code, brand.as_deref(), cli.output),
        Commands::Blik { code } => cmd_blik(&code, cli.output),
    };

    std::process::exit(if valid { 0 } else { 1 });
}

fn cmd_detect(card_number: &str, config: &CheckoutConfiguration, output: OutputFormat) -> bool {
    let detected = detect_locally(card_number, &config.supported_brands);

    match output {
        OutputFormat::Text => {
            if detected.is_empty() {
                println!("Detected Brands: none");
            }
            for card_type in &detected {
                let name = card_type
                    .card_brand
                    .card_type()
                    .map_or(card_type.card_brand.tx_variant(), |t| t.name());
                println!(
                    "{} ({}): supported={}, cvc={}",
                    name,
                    card_type.card_brand,
                    card_type.is_supported,
                    card_type.cvc_policy.as_str()
                );
            }
        }
        OutputFormat::Json => {
            let brands: Vec<_> = detected
                .iter()
                .map(|card_type| {
                    json!({
                        "brand": card_type.card_brand.tx_variant(),
                        "supported": card_type.is_supported,
                        "cvcPolicy": card_type.cvc_policy.as_str(),
                        "expiryDatePolicy": card_type.expiry_date_policy.as_str(),
                    })
                })
                .collect();
            println!("{}", json!({ "brands": brands }));
        }
    }
    !detected.is_empty()
}

fn cmd_validate(
    card_number: &str,
    enable_luhn_check: bool,
    config: &CheckoutConfiguration,
    output: OutputFormat,
) -> bool {
    let detected = detect_locally(card_number, &config.supported_brands);
    // Local guesses never report an unsupported brand
    let card_type = detected.iter().find(|card_type| card_type.is_supported);
    let result = validate_card_number_for_brand(
        card_number,
        enable_luhn_check && card_type.map_or(true, |card_type| card_type.enable_luhn_check),
        true,
    );
    let brand = card_type
        .or_else(|| detected.first())
        .map(|card_type| card_type.card_brand.tx_variant());
    debug!(result = result.code(), brand = ?brand, "Card number validated");

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if result.is_valid() { "yes" } else { "no" });
            println!("Result: {}", result);
            if let Some(brand) = brand {
                println!("Brand: {}", brand);
            }
            println!("Masked: {}", mask_card_number(card_number));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "valid": result.is_valid(),
                    "result": result.code(),
                    "brand": brand,
                    "masked": mask_card_number(card_number),
                })
            );
        }
    }
    result.is_valid()
}

fn cmd_expiry(date: &str, reference: Option<&str>, optional: bool, output: OutputFormat) -> bool {
    let policy = if optional {
        FieldPolicy::Optional
    } else {
        FieldPolicy::Required
    };
    let expiry_date = parse_expiry_date(date);
    let result = match reference {
        Some(reference) => match NaiveDate::parse_from_str(reference, "%Y-%m-%d") {
            Ok(reference) => validate_expiry_date(expiry_date, reference, policy),
            Err(e) => {
                eprintln!("Error: invalid reference date: {}", e);
                std::process::exit(2);
            }
        },
        None => validate_expiry_date_today(expiry_date, policy),
    };

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if result.is_valid() { "yes" } else { "no" });
            println!("Result: {}", result);
            println!("Date: {}", expiry_date);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "valid": result.is_valid(),
                    "result": result.code(),
                    "month": expiry_date.month(),
                    "year": expiry_date.year(),
                })
            );
        }
    }
    result.is_valid()
}

fn cmd_cvc(code: &str, brand: Option<&str>, output: OutputFormat) -> bool {
    let card_type = brand.map(brand_card_type);
    let result = validate_security_code(code, card_type.as_ref());
    let length = expected_length(card_type.as_ref());

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if result.is_valid() { "yes" } else { "no" });
            println!("Result: {}", result);
            println!("Expected Length: {} digits", length);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "valid": result.is_valid(),
                    "result": result.code(),
                    "expectedLength": length,
                })
            );
        }
    }
    result.is_valid()
}

fn cmd_blik(code: &str, output: OutputFormat) -> bool {
    let mut component = blik::create_state_machine();
    component.dispatch(BlikIntent::UpdateBlikCode(code.to_string()));
    let view = component.highlight_validation_errors();
    let valid = component.is_valid();

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if valid { "yes" } else { "no" });
            if let Some(key) = view.blik_code.supporting_text.filter(|_| view.blik_code.is_error) {
                println!("Error: {}", key);
            }
        }
        OutputFormat::Json => {
            let error = view
                .blik_code
                .supporting_text
                .filter(|_| view.blik_code.is_error)
                .map(|key| key.key());
            println!("{}", json!({ "valid": valid, "error": error }));
        }
    }
    valid
}

/// Card type for a brand named on the command line. Predefined brands get
/// the policies local detection would give them.
fn brand_card_type(tx_variant: &str) -> DetectedCardType {
    let card_brand = CardBrand::new(tx_variant);
    match card_brand.card_type() {
        Some(card_type) => local_card_type(card_type, std::slice::from_ref(&card_brand)),
        None => DetectedCardType {
            card_brand,
            is_reliable: false,
            enable_luhn_check: true,
            cvc_policy: FieldPolicy::Required,
            expiry_date_policy: FieldPolicy::Required,
            is_supported: true,
            pan_length: None,
            localized_brand: None,
            payment_method_variant: None,
        },
    }
}
