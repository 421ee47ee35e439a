use std::sync::Arc;

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use splitter_sdk::arrow::BatchTransformer;
use splitter_sdk::prelude::*;
use transform_split::{TransformSplit, CONNECTOR_ID};

const OUTPUT_SCHEMA: &str = r#"{"name":"tags_out","fields":[
    {"name":"id","data_type":"Int64","nullable":false},
    {"name":"tag","data_type":"Utf8","nullable":true}
]}"#;

fn config_json(delimiter: &str, mode: &str) -> String {
    serde_json::json!({
        "fieldToSplit": "tags",
        "delimiter": delimiter,
        "outputField": "tag",
        "schema": OUTPUT_SCHEMA,
        "delimiterMode": mode,
    })
    .to_string()
}

fn input_schema(tags_type: ArrowDataType) -> SchemaRef {
    Arc::new(
        RecordSchema::new(
            "tags_in",
            vec![
                ColumnSchema::new("id", ArrowDataType::Int64, false),
                ColumnSchema::new("tags", tags_type, true),
            ],
        )
        .unwrap(),
    )
}

fn row(schema: &SchemaRef, id: i64, tags: Option<&str>) -> Result<Record, ConnectorError> {
    let mut builder = Record::builder(Arc::clone(schema));
    builder.set("id", id)?.set("tags", tags)?;
    builder.build()
}

fn tags(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("tag").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

#[test]
fn lifecycle_splits_every_record_in_order() {
    let config = parse_config(&config_json(",", "regex")).unwrap();
    let schema = input_schema(ArrowDataType::Utf8);
    assert!(TransformSplit::validate(&config, &schema).unwrap().is_success());

    let mut transform = TransformSplit::init(config).unwrap();
    let ctx = Context::new(CONNECTOR_ID, "tags");
    let rows = vec![
        row(&schema, 1, Some("a, b, c")),
        row(&schema, 2, None),
        row(&schema, 3, Some("solo")),
    ];
    let mut out: Vec<Record> = Vec::new();
    let summary = run_records(&transform, &ctx, &schema, rows, &mut out).unwrap();
    transform.close().unwrap();

    assert_eq!(tags(&out), vec!["a", "b", "c", "solo"]);
    let ids: Vec<_> = out.iter().map(|r| r.get("id").cloned()).collect();
    assert_eq!(
        ids,
        vec![
            Some(Value::Int(1)),
            Some(Value::Int(1)),
            Some(Value::Int(1)),
            Some(Value::Int(3)),
        ]
    );
    assert_eq!(summary.records_in, 3);
    assert_eq!(summary.records_out, 4);
    assert_eq!(summary.records_dropped, 1);
}

#[test]
fn regex_and_literal_modes_disagree_on_dot() {
    let schema = input_schema(ArrowDataType::Utf8);
    let ctx = Context::new(CONNECTOR_ID, "tags");

    let regex = TransformSplit::init(parse_config(&config_json(".", "regex")).unwrap()).unwrap();
    let mut out: Vec<Record> = Vec::new();
    run_records(&regex, &ctx, &schema, vec![row(&schema, 1, Some("a.b"))], &mut out).unwrap();
    assert!(out.is_empty());

    let literal =
        TransformSplit::init(parse_config(&config_json(".", "literal")).unwrap()).unwrap();
    run_records(&literal, &ctx, &schema, vec![row(&schema, 1, Some("a.b"))], &mut out).unwrap();
    assert_eq!(tags(&out), vec!["a", "b"]);
}

#[test]
fn validate_reports_failures_as_results() {
    let config = parse_config(&config_json(",", "regex")).unwrap();
    let result = TransformSplit::validate(&config, &input_schema(ArrowDataType::Int64)).unwrap();
    assert_eq!(result.status, ValidationStatus::Failed);
    assert_eq!(
        result.message,
        "Source field: tags must be of type string. It is type: Int64"
    );

    let mut broken: transform_split::Config = parse_config(&config_json(",", "regex")).unwrap();
    broken.schema = "not json".to_string();
    let result = TransformSplit::validate(&broken, &input_schema(ArrowDataType::Utf8)).unwrap();
    assert_eq!(result.status, ValidationStatus::Failed);
    assert!(result.message.starts_with("Unable to parse output schema"));
}

#[test]
fn validate_warns_when_copied_types_differ() {
    let config = parse_config(&config_json(",", "regex")).unwrap();
    let schema = RecordSchema::new(
        "tags_in",
        vec![
            ColumnSchema::new("id", ArrowDataType::Int32, false),
            ColumnSchema::new("tags", ArrowDataType::Utf8, true),
        ],
    )
    .unwrap();
    let result = TransformSplit::validate(&config, &schema).unwrap();
    assert_eq!(result.status, ValidationStatus::Warning);
    assert!(result.message.contains("'id'"));
}

#[test]
fn init_fails_on_unparseable_output_schema() {
    let mut config: transform_split::Config = parse_config(&config_json(",", "regex")).unwrap();
    config.schema = "{".to_string();
    let err = TransformSplit::init(config).err().unwrap();
    assert_eq!(err.category, ErrorCategory::Config);
    assert_eq!(err.code, "SPLIT_SCHEMA_INVALID");
}

#[test]
fn unknown_delimiter_mode_is_a_config_parse_error() {
    let err = parse_config::<transform_split::Config>(&config_json(",", "glob")).unwrap_err();
    assert_eq!(err.code, "INVALID_CONFIG");
}

#[test]
fn run_stops_on_a_record_from_another_schema() {
    let schema = input_schema(ArrowDataType::Utf8);
    let other = input_schema(ArrowDataType::LargeUtf8);
    let transform =
        TransformSplit::init(parse_config(&config_json(",", "regex")).unwrap()).unwrap();
    let ctx = Context::new(CONNECTOR_ID, "tags");

    let mut out: Vec<Record> = Vec::new();
    let err = run_records(
        &transform,
        &ctx,
        &schema,
        vec![row(&schema, 1, Some("x,y")), row(&other, 2, Some("z"))],
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::Schema);
    assert_eq!(err.code, "SPLIT_INPUT_SCHEMA_CHANGED");
    assert_eq!(tags(&out), vec!["x", "y"]);
}

#[test]
fn batch_transformer_splits_arrow_batches() {
    let transform =
        TransformSplit::init(parse_config(&config_json(r"\s*;\s*", "regex")).unwrap()).unwrap();
    let ctx = Context::new(CONNECTOR_ID, "tags_in");

    let arrow_schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("tags", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        Arc::clone(&arrow_schema),
        vec![
            Arc::new(Int64Array::from(vec![10, 20, 30])),
            Arc::new(StringArray::from(vec![Some("red ; green"), None, Some("blue")])),
        ],
    )
    .unwrap();

    let mut driver = BatchTransformer::open(&transform, &ctx, &arrow_schema).unwrap();
    assert_eq!(driver.input_schema().name, "tags_in");
    let declared = driver.arrow_output_schema().expect("output schema declared up front");
    assert_eq!(driver.output_schema().map(|s| s.name.as_str()), Some("tags_out"));
    let output = driver.transform(&batch).unwrap().expect("rows were emitted");

    assert_eq!(output.num_rows(), 3);
    assert_eq!(output.schema(), declared);
    assert_eq!(output.schema().field(1).name(), "tag");
    let ids = output.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
    let tags = output.column(1).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(ids.values().to_vec(), vec![10, 10, 30]);
    assert_eq!(
        (0..tags.len()).map(|i| tags.value(i)).collect::<Vec<_>>(),
        vec!["red", "green", "blue"]
    );

    let nulls = RecordBatch::try_new(
        arrow_schema,
        vec![
            Arc::new(Int64Array::from(vec![40])),
            Arc::new(StringArray::from(vec![None::<&str>])),
        ],
    )
    .unwrap();
    assert!(driver.transform(&nulls).unwrap().is_none());

    let summary = driver.finish();
    assert_eq!(summary.batches_processed, 2);
    assert_eq!(summary.records_in, 4);
    assert_eq!(summary.records_out, 3);
    assert_eq!(summary.records_dropped, 2);
}
