use anyhow::Result;
use churn_prep::{CliConfig, CsvPipeline, EtlEngine, LocalStorage, TomlConfig};
use churn_prep::core::table_io::read_csv;
use serde_json::json;
use tempfile::TempDir;

const TELCO_SAMPLE: &str = "\
Customer ID,Gender,Age,Married,Number of Dependents,Lat Long,Offer,Internet Type,Contract,Monthly Charge,Total Charges,Churn Category,Churn Reason,Churn
0002-ORFBO,Female,37,Yes,0,\"34.827662, -118.999073\",,Cable,One Year,65.6,593.3,,,No
0003-MKNFE,Male,46,No,0,\"34.162515, -118.203869\",,,Month-to-Month,-4,542.4,,,No
0004-TLHLJ,Male,50,No,0,\"34.1446, -118.182\",Offer E,Fiber Optic,Month-to-Month,73.9,280.85,Competitor,Competitor had better devices,Yes
0011-IGKFF,Male,78,Yes,0,\"34.1, -118.3\",Offer D,Fiber Optic,Month-to-Month,98,1237.85,Dissatisfaction,Product dissatisfaction,Yes
0013-EXCHZ,Female,75,Yes,0,\"34.2, -118.4\",, ,Month-to-Month,83.9, ,Dissatisfaction,Network reliability,Yes
";

fn cli_config(input: String, output_path: String, formats: &[&str], zip: bool) -> CliConfig {
    CliConfig {
        input,
        output_path,
        formats: formats.iter().map(|f| f.to_string()).collect(),
        zip,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

#[tokio::test]
async fn test_end_to_end_csv_preprocessing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("telco.csv");
    std::fs::write(&input, TELCO_SAMPLE)?;
    let output_path = temp_dir.path().join("processed");

    let config = cli_config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["csv", "json"],
        false,
    );
    let engine = EtlEngine::new(CsvPipeline::new(LocalStorage::default(), config));

    let primary = engine.run().await?;

    assert!(primary.ends_with("processed.csv"));
    assert!(output_path.join("processed.json").exists());
    assert!(output_path.join("report.json").exists());

    let processed = read_csv(&std::fs::read(output_path.join("processed.csv"))?)?;
    assert_eq!(processed.row_count(), 5);
    assert_eq!(
        processed.column_names(),
        vec![
            "Age",
            "Number of Dependents",
            "Monthly Charge",
            "Total Charges",
            "Churn",
            "Gender_Male",
            "Married_Yes",
            "Offer_Offer E",
            "Internet Type_Cable",
            "Internet Type_Fiber Optic",
            "Internet Type_No Internet Service",
            "Contract_One Year",
        ]
    );

    // Blank charge coerced to zero, label untouched.
    assert_eq!(
        processed.cell("Total Charges", 4).and_then(|v| v.as_f64()),
        Some(0.0)
    );
    assert_eq!(processed.cell("Churn", 4), Some(&json!("Yes")));

    // Missing Internet Type reads as "No Internet Service".
    assert_eq!(
        processed.cell("Internet Type_No Internet Service", 1),
        Some(&json!(true))
    );
    // A missing Offer is all-false, same as the reference "Offer D".
    assert_eq!(processed.cell("Offer_Offer E", 0), Some(&json!(false)));
    assert_eq!(processed.cell("Offer_Offer E", 3), Some(&json!(false)));
    assert_eq!(processed.cell("Offer_Offer E", 2), Some(&json!(true)));

    Ok(())
}

#[tokio::test]
async fn test_report_describes_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("telco.csv");
    std::fs::write(&input, TELCO_SAMPLE)?;
    let output_path = temp_dir.path().join("out");

    let config = cli_config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["csv"],
        false,
    );
    EtlEngine::new(CsvPipeline::new(LocalStorage::default(), config))
        .run()
        .await?;

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_path.join("report.json"))?)?;
    assert_eq!(report["rows"], json!(5));
    assert_eq!(report["columns_in"], json!(14));
    assert_eq!(report["columns_out"], json!(12));
    assert_eq!(
        report["dropped_columns"],
        json!(["Customer ID", "Lat Long", "Churn Category", "Churn Reason"])
    );
    assert_eq!(report["filled_cells"], json!(1));
    assert_eq!(report["coerced_to_zero"], json!(1));

    let internet = report["encoded"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["column"] == "Internet Type")
        .unwrap();
    assert_eq!(internet["reference"], json!(" "));

    Ok(())
}

#[tokio::test]
async fn test_zip_bundle_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("telco.csv");
    std::fs::write(&input, TELCO_SAMPLE)?;
    let output_path = temp_dir.path().join("bundle");

    let config = cli_config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["csv", "json"],
        true,
    );
    let primary = EtlEngine::new(CsvPipeline::new(LocalStorage::default(), config))
        .run()
        .await?;

    assert!(primary.ends_with("processed.zip"));
    assert!(!output_path.join("processed.csv").exists());

    let zip_data = std::fs::read(output_path.join("processed.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        file_names,
        vec!["processed.csv", "processed.json", "report.json"]
    );

    let mut csv_file = archive.by_name("processed.csv")?;
    let mut csv_content = String::new();
    std::io::Read::read_to_string(&mut csv_file, &mut csv_content)?;
    assert!(csv_content.starts_with("Age,Number of Dependents,Monthly Charge,Total Charges,Churn"));

    Ok(())
}

#[tokio::test]
async fn test_toml_configured_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");
    std::fs::write(temp_dir.path().join("telco.csv"), TELCO_SAMPLE)?;

    let config_content = format!(
        r#"
[pipeline]
name = "telco-churn"
version = "1.0.0"

[source]
input = "{0}/telco.csv"

[load]
output_path = "{0}/out"
output_formats = ["json"]
"#,
        temp_path
    );
    let config_path = temp_dir.path().join("churn-prep.toml");
    tokio::fs::write(&config_path, config_content).await?;
    let config = TomlConfig::from_file(&config_path)?;

    let primary = EtlEngine::new(CsvPipeline::new(LocalStorage::default(), config))
        .run()
        .await?;

    assert!(primary.ends_with("processed.json"));
    let records: serde_json::Value = serde_json::from_slice(&std::fs::read(&primary)?)?;
    let first = records[0].as_object().unwrap();

    // The smallest label is the reference: "Female" and the blank " ".
    assert!(first.contains_key("Gender_Male"));
    assert!(first.contains_key("Internet Type_Cable"));
    assert!(first.contains_key("Internet Type_No Internet Service"));
    assert!(!first.contains_key("Internet Type_ "));
    assert_eq!(first["Internet Type_Cable"], json!(true));
    assert_eq!(first["Total Charges"], json!(593.3));

    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = cli_config(
        temp_dir.path().join("absent.csv").to_string_lossy().into_owned(),
        temp_dir.path().join("out").to_string_lossy().into_owned(),
        &["csv"],
        false,
    );

    let result = EtlEngine::new(CsvPipeline::new(LocalStorage::default(), config))
        .run()
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.severity().exit_code(), 2);
    assert!(!temp_dir.path().join("out").exists());

    Ok(())
}
