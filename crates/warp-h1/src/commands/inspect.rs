//! `warp-h1 inspect`: run a captured request through the parser.

use std::io::Read;

use anyhow::{bail, Context, Result};
use bytes::BytesMut;
use serde::Serialize;
use tracing::{debug, info};
use warpgrid_h1::{Header, ParserConfig, RequestParser};

use super::load_config;

/// What the parser made of the input.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub state: String,
    pub method: Option<String>,
    pub path: Option<String>,
    pub version: Option<String>,
    pub headers: Vec<Header>,
    pub declared_body_length: Option<u64>,
    pub body_bytes: Option<u64>,
    pub spilled: Option<bool>,
    pub fragments: usize,
    pub residual_bytes: usize,
}

pub fn inspect(
    file: &str,
    chunk_size: Option<usize>,
    config: Option<&str>,
    format: &str,
) -> Result<()> {
    let config = load_config(config)?;
    let input = read_input(file)?;
    info!(file, bytes = input.len(), "inspecting request");

    let report = run(&input, chunk_size, config)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print!("{}", format_report(&report));
        }
    }

    Ok(())
}

fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == "-" {
        let mut input = Vec::new();
        std::io::stdin()
            .read_to_end(&mut input)
            .context("reading request from stdin")?;
        return Ok(input);
    }
    std::fs::read(file).with_context(|| format!("reading request from {file}"))
}

/// Feed `input` to a fresh parser in fragments of `chunk_size` bytes.
pub fn run(input: &[u8], chunk_size: Option<usize>, config: ParserConfig) -> Result<InspectReport> {
    let chunk_size = chunk_size.unwrap_or(input.len().max(1));
    if chunk_size == 0 {
        bail!("--chunk-size must be greater than zero");
    }

    let mut parser = RequestParser::with_config(config);
    let mut buf = BytesMut::new();
    let mut fragments = 0;
    let mut delivered = 0;

    for piece in input.chunks(chunk_size) {
        fragments += 1;
        delivered += piece.len();
        buf.extend_from_slice(piece);
        parser.feed_buf(&mut buf).with_context(|| {
            format!(
                "parse failed in fragment {fragments} ({} of {} bytes consumed)",
                delivered - buf.len(),
                input.len()
            )
        })?;
        debug!(fragment = fragments, state = ?parser.state(), buffered = buf.len(), "fed fragment");
    }

    Ok(InspectReport {
        state: format!("{:?}", parser.state()),
        method: parser.method().map(|m| m.to_string()),
        path: parser.path().map(str::to_string),
        version: parser.version().map(|(major, minor)| format!("{major}.{minor}")),
        headers: parser.headers().iter().cloned().collect(),
        declared_body_length: parser.declared_body_length(),
        body_bytes: parser.body().map(|b| b.len()),
        spilled: parser.body().map(|b| b.is_spilled()),
        fragments,
        residual_bytes: buf.len(),
    })
}

/// Format a report as human-readable text.
pub fn format_report(report: &InspectReport) -> String {
    let mut out = String::new();
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    out.push_str(&format!("State:    {}\n", report.state));
    out.push_str(&format!("Method:   {}\n", or_dash(report.method.as_deref())));
    out.push_str(&format!("Path:     {}\n", or_dash(report.path.as_deref())));
    out.push_str(&format!("Version:  {}\n", or_dash(report.version.as_deref())));

    out.push_str(&format!("Headers:  {}\n", report.headers.len()));
    for header in &report.headers {
        out.push_str(&format!("  {}: {}\n", header.name, header.value));
    }

    match (report.declared_body_length, report.body_bytes) {
        (Some(declared), Some(received)) => {
            let storage = if report.spilled == Some(true) { "disk" } else { "memory" };
            out.push_str(&format!("Body:     {received}/{declared} bytes ({storage})\n"));
        }
        _ => out.push_str("Body:     none\n"),
    }

    out.push_str(&format!("Fragments: {}\n", report.fragments));
    out.push_str(&format!("Residual: {} bytes\n", report.residual_bytes));
    out
}
