//! Tabular (CSV) and GIS (GeoJSON) writers for concession records.

use std::io::Write;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use mensura_core::models::Crs;
use mensura_core::{ConcessionRecord, DateField, FieldName};

/// A record together with the name of the document it came from.
#[derive(Debug, Clone, Copy)]
pub struct SourcedRecord<'a> {
    pub source: &'a str,
    pub record: &'a ConcessionRecord,
}

impl<'a> SourcedRecord<'a> {
    pub fn new(source: &'a str, record: &'a ConcessionRecord) -> Self {
        Self { source, record }
    }
}

/// Column names of the tabular export, in order.
pub fn csv_header() -> Vec<&'static str> {
    let mut header = vec!["source", "kind", "role"];
    header.extend(FieldName::ALL.iter().map(FieldName::as_str));
    header.extend(DateField::ALL.iter().map(DateField::as_str));
    header.extend([
        "reference_easting",
        "reference_northing",
        "vertex_count",
        "boundary_source",
        "area_ha",
        "warnings",
    ]);
    header
}

fn csv_row(item: &SourcedRecord<'_>) -> Vec<String> {
    let record = item.record;

    let mut row = vec![
        item.source.to_string(),
        record.kind.as_str().to_string(),
        record.role.as_str().to_string(),
    ];
    row.extend(FieldName::ALL.iter().map(|n| record.field(*n).to_string()));
    row.extend(DateField::ALL.iter().map(|d| record.date(*d).canonical()));

    let (easting, northing) = record
        .reference_point
        .map(|p| (p.easting.to_string(), p.northing.to_string()))
        .unwrap_or_default();
    row.push(easting);
    row.push(northing);
    row.push(record.boundary.vertex_count().to_string());
    row.push(
        record
            .boundary
            .source()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
    );
    row.push(
        record
            .boundary
            .area_hectares()
            .map(|a| format!("{:.4}", a))
            .unwrap_or_default(),
    );
    row.push(record.warnings.join("; "));

    row
}

/// Write one row per record, header first.
pub fn write_csv<W: Write>(writer: W, records: &[SourcedRecord<'_>]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(csv_header())?;
    for item in records {
        wtr.write_record(csv_row(item))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn format_csv(records: &[SourcedRecord<'_>]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}

fn feature(item: &SourcedRecord<'_>) -> Option<Feature> {
    let polygon = item.record.boundary.to_polygon()?;

    let mut properties = JsonObject::new();
    properties.insert("source".to_string(), JsonValue::from(item.source));
    properties.insert("kind".to_string(), JsonValue::from(item.record.kind.as_str()));
    properties.insert("role".to_string(), JsonValue::from(item.record.role.as_str()));
    for (name, value) in item.record.flat_fields() {
        properties.insert(name.to_string(), JsonValue::from(value));
    }
    if let Some(source) = item.record.boundary.source() {
        properties.insert("boundary_source".to_string(), JsonValue::from(source.as_str()));
    }

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// One feature per record with a boundary; records without one are left out.
pub fn feature_collection(records: &[SourcedRecord<'_>], crs: Crs) -> FeatureCollection {
    let features: Vec<Feature> = records.iter().filter_map(feature).collect();

    let mut crs_properties = JsonObject::new();
    crs_properties.insert("name".to_string(), JsonValue::from(crs.urn()));
    let mut crs_member = JsonObject::new();
    crs_member.insert("type".to_string(), JsonValue::from("name"));
    crs_member.insert("properties".to_string(), JsonValue::Object(crs_properties));

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("crs".to_string(), JsonValue::Object(crs_member));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

pub fn format_geojson(records: &[SourcedRecord<'_>], crs: Crs) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&feature_collection(records, crs))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_core::{MensuraParser, NoticeParser};

    const NOTICE: &str = "SOLICITUD DE MENSURA\n\
        Juzgado de Letras de Vallenar, Rol: 567-2024\n\
        pertenencia \"CERRO NEGRO 1 AL 5\", comuna de Alto del Carmen.\n\
        V1  6.820.000,00  350.000,00\n\
        V2  6.820.000,00  350.500,00\n\
        V3  6.819.000,00  350.500,00\n\
        V4  6.819.000,00  350.000,00";

    #[test]
    fn test_csv_header_and_row() {
        let result = MensuraParser::new().parse_text(NOTICE);
        let records: Vec<_> = result
            .records
            .iter()
            .map(|r| SourcedRecord::new("aviso.txt", r))
            .collect();

        let output = format_csv(&records).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header.len(), csv_header().len());
        assert_eq!(header[3], "property_name");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "aviso.txt");
        assert_eq!(&rows[0][1], "mensura");
        assert_eq!(&rows[0][3], "CERRO NEGRO 1 AL 5");

        let vertex_column = header.iter().position(|h| h == "vertex_count").unwrap();
        assert_eq!(&rows[0][vertex_column], "4");
        let area_column = header.iter().position(|h| h == "area_ha").unwrap();
        assert_eq!(&rows[0][area_column], "50.0000");
    }

    #[test]
    fn test_geojson_omits_records_without_boundary() {
        let parser = MensuraParser::new();
        let with_boundary = parser.parse_text(NOTICE);
        let without = parser.parse_text("lorem ipsum");

        let records = vec![
            SourcedRecord::new("a.txt", &with_boundary.records[0]),
            SourcedRecord::new("b.txt", &without.records[0]),
        ];
        let collection = feature_collection(&records, Crs::Epsg32719);

        assert_eq!(collection.features.len(), 1);
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["source"], "a.txt");
        assert_eq!(properties["property_name"], "CERRO NEGRO 1 AL 5");
        assert_eq!(properties["verification_code"], "Undetermined");
    }

    #[test]
    fn test_geojson_crs_member() {
        let json = format_geojson(&[], Crs::Epsg24879).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(
            value["crs"]["properties"]["name"],
            "urn:ogc:def:crs:EPSG::24879"
        );
    }
}
