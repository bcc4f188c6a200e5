use hhi_etl::{CliConfig, EtlEngine, EtlError, HhiPipeline, LocalStorage};
use std::io::Read;
use tempfile::TempDir;

fn cli_config(input: &str, output_path: &str) -> CliConfig {
    CliConfig {
        input: input.to_string(),
        output_path: output_path.to_string(),
        cutoff: "2022-12-01".to_string(),
        digits: 4,
        supplier_column: "CEDULA_PROVEEDOR".to_string(),
        product_column: "CODIGO_PRODUCTO".to_string(),
        date_column: "FECHA_REGISTRO".to_string(),
        delimiter: None,
        date_formats: vec![],
        formats: vec!["csv".to_string()],
        zip: false,
        top_changes: 40,
        top_improved: 30,
        verbose: false,
        monitor: false,
        json_logs: false,
    }
}

/// Domain 1234: {A:30, B:70} before, {A:50, B:25, C:25} after.
/// Domain 5678: {A:1} before, {A:1, B:1} after.
/// Domain 9999 only exists before.
fn write_fixture(dir: &TempDir) -> String {
    let mut csv = String::from("NRO_SICOP,CEDULA_PROVEEDOR,CODIGO_PRODUCTO,FECHA_REGISTRO\n");
    let mut line = 0;
    let mut add = |supplier: &str, code: &str, date: &str, n: usize| {
        for _ in 0..n {
            line += 1;
            csv.push_str(&format!("{},{},{},{}\n", line, supplier, code, date));
        }
    };
    add("3101000001", "12340001", "2022-03-15 08:00:00", 30);
    add("3101000002", "12349999", "2022-11-30 23:59:59", 70);
    add("3101000001", "12340001", "2022-12-01 00:00:00", 50);
    add("3101000002", "12340002", "2023-01-10 10:00:00", 25);
    add("3101000003", "12340003", "2023-02-10 10:00:00", 25);
    add("3101000001", "56780001", "15/06/2022", 1);
    add("3101000001", "56780001", "15/06/2023", 1);
    add("3101000002", "56780002", "16/06/2023", 1);
    add("3101000004", "99990001", "2022-01-01", 3);
    add("3101000004", "12340001", "sin fecha", 2);

    let path = dir.path().join("lineascontratadas.csv");
    std::fs::write(&path, csv).unwrap();
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_end_to_end_comparison_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir);
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = HhiPipeline::new(storage, cli_config(&input, &output_path));
    let engine = EtlEngine::new(pipeline);

    let result = engine.run().await.unwrap();
    assert!(result.ends_with("cambio_hhi_dominios_4digitos.csv"));

    let table = std::fs::read_to_string(
        std::path::Path::new(&output_path).join("cambio_hhi_dominios_4digitos.csv"),
    )
    .unwrap();
    assert_eq!(
        table,
        "domain_key,hhi_before,hhi_after,delta\n\
         1234,5800,3750,2050\n\
         5678,10000,5000,5000\n"
    );
}

#[tokio::test]
async fn test_end_to_end_json_report_and_zip() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir);
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let mut config = cli_config(&input, &output_path);
    config.formats = vec!["csv".to_string(), "tsv".to_string(), "json".to_string()];
    config.zip = true;

    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new_with_monitoring(HhiPipeline::new(storage, config), false);

    let result = engine.run().await.unwrap();
    assert!(result.ends_with("hhi_output.zip"));

    let zip_data = std::fs::read(std::path::Path::new(&output_path).join("hhi_output.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 3);

    let mut json = String::new();
    archive.by_name("report.json").unwrap().read_to_string(&mut json).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(report["cutoff"], "2022-12-01");
    assert_eq!(report["periods"]["records_before"], 104);
    assert_eq!(report["periods"]["records_after"], 102);
    assert_eq!(report["periods"]["domains_before"], 3);
    assert_eq!(report["periods"]["domains_after"], 2);
    assert_eq!(report["data_quality"]["total_rows"], 208);
    assert_eq!(report["data_quality"]["unparseable_dates"], 2);
    assert_eq!(report["summary"]["total_domains"], 2);
    assert_eq!(report["summary"]["improved_count"], 0);
    assert_eq!(report["summary"]["positive_delta_count"], 2);
    assert_eq!(report["summary"]["improved_percent"], 0.0);
    assert_eq!(report["charts"]["top_changes"][0]["domain_key"], "1234");
    assert_eq!(report["charts"]["most_improved"], serde_json::json!([]));
}

#[tokio::test]
async fn test_missing_column_fails_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("lineas.csv");
    std::fs::write(&input, "CEDULA_PROVEEDOR,CODIGO_PRODUCTO\n1,1234\n").unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = HhiPipeline::new(storage, cli_config(input.to_str().unwrap(), &output_path));
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::SchemaError { .. }));
    assert!(!std::path::Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_missing_input_file_fails_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let input = temp_dir.path().join("nope.csv");

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = HhiPipeline::new(storage, cli_config(input.to_str().unwrap(), &output_path));
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::InputUnavailable { .. }));
}

#[tokio::test]
async fn test_all_dates_unparseable_is_empty_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("lineas.csv");
    std::fs::write(
        &input,
        "CEDULA_PROVEEDOR,CODIGO_PRODUCTO,FECHA_REGISTRO\n1,1234,??\n2,1234,\n",
    )
    .unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = HhiPipeline::new(storage, cli_config(input.to_str().unwrap(), &output_path));
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::EmptyInput { .. }));
}

#[tokio::test]
async fn test_one_empty_period_writes_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("lineas.csv");
    std::fs::write(
        &input,
        "CEDULA_PROVEEDOR,CODIGO_PRODUCTO,FECHA_REGISTRO\n1,1234,2023-05-01\n2,1234,2023-05-02\n",
    )
    .unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = HhiPipeline::new(storage, cli_config(input.to_str().unwrap(), &output_path));
    EtlEngine::new(pipeline).run().await.unwrap();

    let table = std::fs::read_to_string(
        std::path::Path::new(&output_path).join("cambio_hhi_dominios_4digitos.csv"),
    )
    .unwrap();
    assert_eq!(table, "domain_key,hhi_before,hhi_after,delta\n");
}
