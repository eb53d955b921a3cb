//! Wirebuf Demo - Request Encoding Benchmark
//!
//! Membangun produce-style request (length prefix → header → topic array →
//! message set dengan CRC-32 prefix), print hex dump, lalu ukur latency encode.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]

use std::time::Instant;

use wirebuf::protocol::{RequestBuffer, Result};

/// Demo configuration
struct DemoConfig {
    iterations: usize,
    payload_size: usize,
    verbose: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            payload_size: 64,
            verbose: false,
        }
    }
}

const CLIENT_ID: &str = "wirebuf-demo";
const TOPIC: &str = "events";
const API_KEY_PRODUCE: i64 = 0;
const API_VERSION: i64 = 0;
const REQUIRED_ACKS: i64 = 1;
const TIMEOUT_MS: i64 = 1_000;

fn main() {
    let config = parse_args();

    println!("📦 Wirebuf - Request Buffer Demo");
    println!("================================\n");

    let payload = vec![0xABu8; config.payload_size];

    let mut buf = RequestBuffer::new();
    if let Err(e) = build_produce_request(&mut buf, 1, TOPIC, &payload) {
        eprintln!("❌ Encoding failed: {}", e);
        std::process::exit(1);
    }
    let request = buf.finalize();

    println!("  Request size: {} bytes", request.len());
    if config.verbose {
        println!();
        print_hex_dump(&request);
        println!();
    }

    benchmark_encode(&config, &payload);

    println!("\n✅ Done!");
}

/// Produce request v0, satu topic, satu partition, satu message
fn build_produce_request(
    buf: &mut RequestBuffer,
    correlation_id: i64,
    topic: &str,
    payload: &[u8],
) -> Result<()> {
    buf.with_length_prefix(|b| {
        b.write_int16(API_KEY_PRODUCE)?;
        b.write_int16(API_VERSION)?;
        b.write_int32(correlation_id)?;
        b.write_str(Some(CLIENT_ID))?;
        b.write_int16(REQUIRED_ACKS)?;
        b.write_int32(TIMEOUT_MS)?;

        b.write_array([topic], |b, topic| {
            b.write_str(Some(topic))?;
            b.write_array([0i64], |b, partition| {
                b.write_int32(partition)?;
                // Message set size
                b.with_length_prefix(|b| {
                    b.write_int64(0); // offset
                    b.with_length_prefix(|b| {
                        b.with_crc32_prefix(|b| {
                            b.write_int8(0)?; // magic
                            b.write_int8(0)?; // attributes
                            b.write_bytes(None)?; // key
                            b.write_bytes(Some(payload))
                        })
                    })
                })
            })
        })
    })
}

fn benchmark_encode(config: &DemoConfig, payload: &[u8]) {
    println!("📊 Encode Benchmark (Backpatching Buffer)");
    println!("-----------------------------------------");

    let mut total_bytes = 0usize;
    let start = Instant::now();
    for i in 0..config.iterations {
        let mut buf = RequestBuffer::with_capacity(128 + payload.len());
        // Correlation id berputar di range int32
        let correlation_id = (i % i32::MAX as usize) as i64;
        if build_produce_request(&mut buf, correlation_id, TOPIC, payload).is_err() {
            eprintln!("❌ Encoding failed at iteration {}", i);
            return;
        }
        total_bytes += buf.into_bytes().len();
    }
    let duration = start.elapsed();

    let encode_ns = duration.as_nanos() as f64 / config.iterations.max(1) as f64;

    println!("  Payload size: {} bytes", payload.len());
    println!("  Encode ops: {}", config.iterations);
    println!(
        "  Encode latency: {:.2} ns/op ({:.3} μs/op)",
        encode_ns,
        encode_ns / 1000.0
    );
    println!(
        "  Encode throughput: {:.2} M reqs/sec ({:.2} MB/sec)",
        config.iterations as f64 / duration.as_secs_f64() / 1_000_000.0,
        total_bytes as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

fn print_hex_dump(data: &[u8]) {
    for (i, chunk) in data.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {:08x}  {}", i * 16, hex.join(" "));
    }
}

fn parse_args() -> DemoConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = DemoConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-n" => {
                if i + 1 < args.len() {
                    config.iterations = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--payload" | "-p" => {
                if i + 1 < args.len() {
                    config.payload_size = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("Wirebuf Demo - Request Buffer Encoding\n");
                println!("Usage: wirebuf [OPTIONS]\n");
                println!("Options:");
                println!("  -n, --iterations <N>  Encode iterations (default: 100000)");
                println!("  -p, --payload <BYTES> Message payload size (default: 64)");
                println!("  -v, --verbose         Print request hex dump");
                println!("  -h, --help            Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}
