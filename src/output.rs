use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::harvest::Dataset;
use crate::results::ListingRecord;

/// File name of the dataset inside the output directory
pub const DATASET_FILE: &str = "anuncios_airbnb.csv";

/// One CSV row, columns in their fixed order
#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Titulo")]
    title: &'a str,
    #[serde(rename = "Descripción")]
    description: &'a str,
    #[serde(rename = "Info")]
    info: String,
    #[serde(rename = "Precio")]
    price: Option<f64>,
    #[serde(rename = "Precio con descuento")]
    discounted_price: Option<f64>,
    #[serde(rename = "Valoración")]
    rating: Option<f64>,
    #[serde(rename = "Número de valoraciones")]
    rating_count: Option<u32>,
    #[serde(rename = "Viajeros")]
    travelers: Option<u32>,
    #[serde(rename = "Dormitorios")]
    bedrooms: Option<u32>,
    #[serde(rename = "Camas")]
    beds: Option<u32>,
    #[serde(rename = "Baños")]
    baths: Option<u32>,
    #[serde(rename = "Enlace")]
    link: &'a str,
    #[serde(rename = "Imagenes")]
    images: String,
}

impl<'a> From<&'a ListingRecord> for Row<'a> {
    fn from(record: &'a ListingRecord) -> Self {
        Self {
            id: &record.id,
            title: &record.title,
            description: &record.description,
            info: bracketed(record.amenity_lines.iter().map(String::as_str)),
            price: record.price_low,
            discounted_price: record.price_high,
            rating: record.rating,
            rating_count: record.rating_count,
            travelers: record.travelers,
            bedrooms: record.bedrooms,
            beds: record.beds,
            baths: record.baths,
            link: record.link.as_str(),
            images: bracketed(record.image_refs.iter().map(|url| url.as_str())),
        }
    }
}

/// `['a', 'b']`, or `[]` when empty
pub fn bracketed<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let quoted = items
        .into_iter()
        .map(|item| format!("'{}'", item.replace('\'', "\\'")))
        .collect::<Vec<_>>();
    format!("[{}]", quoted.join(", "))
}

/// Writes the dataset as CSV to any writer
pub fn write_records<W: std::io::Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if dataset.is_empty() {
        // serde only emits headers alongside the first row
        writer.write_record(HEADERS)?;
    }
    for record in dataset {
        writer.serialize(Row::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the dataset to `path`, creating parent directories
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_records(dataset, file)?;
    ::log::info!(records = dataset.len(); "Wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}

const HEADERS: [&str; 14] = [
    "ID",
    "Titulo",
    "Descripción",
    "Info",
    "Precio",
    "Precio con descuento",
    "Valoración",
    "Número de valoraciones",
    "Viajeros",
    "Dormitorios",
    "Camas",
    "Baños",
    "Enlace",
    "Imagenes",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::RawListing;
    use url::Url;

    fn dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.push(RawListing {
            id: "42".to_string(),
            title: "Piso, céntrico".to_string(),
            price_text: "120 € 95 €".to_string(),
            description: "Luminoso".to_string(),
            amenity_lines: vec!["4 viajeros".to_string(), "2 camas".to_string()],
            rating_text: Some("4,5".to_string()),
            review_count: Some("10".to_string()),
            review_count_link: None,
            link: Url::parse("https://example.test/rooms/42").unwrap(),
            image_refs: vec![Url::parse("https://img.example.test/42.jpg").unwrap()],
        });
        dataset.push(RawListing {
            id: "7".to_string(),
            title: "Estudio".to_string(),
            price_text: String::new(),
            description: String::new(),
            amenity_lines: Vec::new(),
            rating_text: None,
            review_count: None,
            review_count_link: None,
            link: Url::parse("https://example.test/rooms/7").unwrap(),
            image_refs: Vec::new(),
        });
        dataset
    }

    #[test]
    fn test_header_and_rows() {
        let mut out = Vec::new();
        write_records(&dataset(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], HEADERS.join(","));
        assert_eq!(
            lines[1],
            "42,\"Piso, céntrico\",Luminoso,\"['4 viajeros', '2 camas']\",120.0,95.0,4.5,10,4,,2,,https://example.test/rooms/42,['https://img.example.test/42.jpg']"
        );
        assert_eq!(lines[2], "7,Estudio,,[],,,,,,,,,https://example.test/rooms/7,[]");
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let mut out = Vec::new();
        write_records(&Dataset::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), HEADERS.join(","));
    }

    #[test]
    fn test_write_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset").join(DATASET_FILE);
        write_csv(&dataset(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 14);
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed(Vec::<&str>::new()), "[]");
        assert_eq!(bracketed(["a"]), "['a']");
        assert_eq!(bracketed(["it's"]), r"['it\'s']");
    }
}
