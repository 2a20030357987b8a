use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::model::{lenient_count, AccoladeTriplet, CountryRow, VenueRecord};

/// Fixed leading columns of a results table. Everything after them is read
/// in strides of three: medals, all-star, all-league for each edition.
pub const FIXED_COLUMNS: [&str; 5] =
    ["Country", "Country_Code", "Continent", "Population", "GDP_Per_Capita"];

pub const VENUE_COLUMNS: [&str; 4] = ["ID", "Year", "City", "Country"];

pub const TRIPLET_STRIDE: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub bad_rows: u64,
    pub edition_columns: usize,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub expected: Vec<String>,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub rows: u64,
    pub bad_rows: u64,
    pub duplicate_codes: u64,
    pub warnings: Vec<String>,
}

/// Split one CSV line on commas, honoring double-quoted fields so population
/// cells like "1,000,000" stay intact. `""` inside quotes is a literal quote.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(cur.trim().to_string());
                cur.clear();
            }
            _ => cur.push(c),
        }
    }
    fields.push(cur.trim().to_string());
    fields
}

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

/// Parse a results table. The header must carry the fixed leading columns;
/// trailing columns are consumed in strides of three, with a partial trailing
/// stride zero-padded. Rows too short to name a country are dropped.
pub fn parse_results_csv(text: &str) -> Result<Vec<CountryRow>> {
    let mut lines = content_lines(text);
    let header = split_line(lines.next().ok_or_else(|| anyhow!("empty results table"))?);
    if header.len() < FIXED_COLUMNS.len() || header[..FIXED_COLUMNS.len()] != FIXED_COLUMNS {
        bail!(
            "results header mismatch: got {:?} expected {:?} ...",
            header,
            FIXED_COLUMNS
        );
    }

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_line(line);
        if fields.len() < FIXED_COLUMNS.len() {
            continue;
        }
        let mut editions = Vec::new();
        let tail = &fields[FIXED_COLUMNS.len()..];
        for chunk in tail.chunks(TRIPLET_STRIDE) {
            editions.push(AccoladeTriplet {
                medals: lenient_count(chunk.first().map(String::as_str).unwrap_or("")),
                all_star: lenient_count(chunk.get(1).map(String::as_str).unwrap_or("")),
                all_league: lenient_count(chunk.get(2).map(String::as_str).unwrap_or("")),
            });
        }
        rows.push(CountryRow {
            name: fields[0].clone(),
            code: fields[1].clone(),
            continent: fields[2].clone(),
            population: fields[3].clone(),
            gdp_per_capita: fields[4].clone(),
            editions,
        });
    }
    Ok(rows)
}

/// Parse a venue table and order it by edition id. The record count is what
/// defines how many editions are navigable.
pub fn parse_venues_csv(text: &str) -> Result<Vec<VenueRecord>> {
    let mut lines = content_lines(text);
    let header = split_line(lines.next().ok_or_else(|| anyhow!("empty venue table"))?);
    if header.len() < VENUE_COLUMNS.len() || header[..VENUE_COLUMNS.len()] != VENUE_COLUMNS {
        bail!(
            "venue header mismatch: got {:?} expected {:?}",
            header,
            VENUE_COLUMNS
        );
    }

    let mut records = Vec::new();
    for line in lines {
        let fields = split_line(line);
        let field = |i: usize| fields.get(i).cloned().unwrap_or_default();
        records.push(VenueRecord {
            id: lenient_count(&field(0)),
            year: field(1),
            city: field(2),
            country: field(3),
        });
    }
    records.sort_by_key(|r| r.id);
    Ok(records)
}

/// Header check for a results file: fixed leading columns plus a trailing
/// column count that is a whole number of triplet strides.
pub fn validate_schema(path: &Path) -> Result<SchemaReport> {
    let header = read_header(path)?;
    let expected: Vec<String> = FIXED_COLUMNS.iter().map(|s| s.to_string()).collect();
    let prefix_ok =
        header.len() >= FIXED_COLUMNS.len() && header[..FIXED_COLUMNS.len()] == FIXED_COLUMNS;
    let stride_ok = prefix_ok && (header.len() - FIXED_COLUMNS.len()) % TRIPLET_STRIDE == 0;
    let message = if !prefix_ok {
        format!("schema mismatch: got {:?} expected prefix {:?}", header, expected)
    } else if !stride_ok {
        format!(
            "trailing columns not a whole number of triplets: {} after the fixed {}",
            header.len() - FIXED_COLUMNS.len(),
            FIXED_COLUMNS.len()
        )
    } else {
        "schema ok".to_string()
    };
    Ok(SchemaReport {
        columns: header,
        expected,
        ok: prefix_ok && stride_ok,
        message,
    })
}

pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok(split_line(trimmed));
    }
    Ok(Vec::new())
}

/// Walk a results file and produce its manifest: content hash, row counts,
/// and the warnings a loader would want to know about before trusting it.
pub fn analyze_csv(path: &Path, now_epoch: u64) -> Result<(DatasetManifest, DataQualityReport)> {
    let hash = file_sha256(path)?;
    let mut warnings = Vec::new();

    let file = File::open(path)?;
    let mut header: Vec<String> = Vec::new();
    let mut row_count = 0u64;
    let mut bad_rows = 0u64;
    let mut duplicate_codes = 0u64;
    let mut seen_codes: HashSet<String> = HashSet::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = split_line(trimmed);
        if header.is_empty() {
            header = fields;
            if header.len() < FIXED_COLUMNS.len() || header[..FIXED_COLUMNS.len()] != FIXED_COLUMNS
            {
                warnings.push("header_mismatch".to_string());
            } else if (header.len() - FIXED_COLUMNS.len()) % TRIPLET_STRIDE != 0 {
                warnings.push("partial_trailing_triplet".to_string());
            }
            continue;
        }
        if fields.len() < FIXED_COLUMNS.len() {
            bad_rows += 1;
            warnings.push(format!("short_row: {} fields", fields.len()));
            continue;
        }
        row_count += 1;
        if fields.len() != header.len() {
            warnings.push(format!("ragged_row: {} ({} fields)", fields[1], fields.len()));
        }
        if !seen_codes.insert(fields[1].clone()) {
            duplicate_codes += 1;
            warnings.push(format!("duplicate_code: {}", fields[1]));
        }
    }

    if header.is_empty() {
        warnings.push("missing_header".to_string());
    }

    let edition_columns = header.len().saturating_sub(FIXED_COLUMNS.len());
    let manifest = DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        row_count,
        bad_rows,
        edition_columns,
        columns: header,
        warnings: warnings.clone(),
        generated_at_epoch: now_epoch,
    };
    let report = DataQualityReport {
        rows: row_count,
        bad_rows,
        duplicate_codes,
        warnings,
    };
    Ok((manifest, report))
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_honors_quoted_commas() {
        let fields = split_line(r#"Norway,NOR,Europe,"5,425,270","89,202",1,0,0"#);
        assert_eq!(fields[3], "5,425,270");
        assert_eq!(fields[4], "89,202");
        assert_eq!(fields.len(), 8);
    }

    #[test]
    fn split_unescapes_doubled_quotes() {
        let fields = split_line(r#"a,"he said ""hi"", twice",c"#);
        assert_eq!(fields[1], r#"he said "hi", twice"#);
    }

    #[test]
    fn results_rows_carry_typed_editions() {
        let text = "\
Country,Country_Code,Continent,Population,GDP_Per_Capita,M1,S1,L1,M2,S2,L2
United States,USA,North America,\"331,900,000\",\"70,248\",3,10,4,2,8,
Angola,AGO,Africa,\"34,500,000\",\"1,953\",,,,1,,";
        let rows = parse_results_csv(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].editions.len(), 2);
        assert_eq!(rows[0].triplet(1).total(), 17);
        // Blank cells read as zero.
        assert_eq!(rows[0].triplet(2).total(), 10);
        assert_eq!(rows[1].triplet(1).total(), 0);
        assert_eq!(rows[1].triplet(2).total(), 1);
    }

    #[test]
    fn results_header_mismatch_is_fatal() {
        let text = "ts,open,high\n1,2,3";
        assert!(parse_results_csv(text).is_err());
    }

    #[test]
    fn venues_sort_by_id() {
        let text = "\
ID,Year,City,Country
2,1948,London,United Kingdom
1,1936,Berlin,Germany";
        let venues = parse_venues_csv(text).unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].id, 1);
        assert_eq!(venues[0].city, "Berlin");
        assert_eq!(venues[1].year, "1948");
    }
}
