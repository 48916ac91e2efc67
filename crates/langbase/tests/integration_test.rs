//! Integration tests for the langbase pipeline.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use langbase::{LangbaseError, Pipeline, PipelineConfig, SourceKind, SourcePaths, TableReader};

const LANGUOID: &str = "id,name,status\n\
'abcd1234','Alpha','safe'\n\
efgh5678,'Beta, the second','\\'definitely endangered\\''\n\
ijkl9012,Gamma,NULL\n\
mnop3456,'Broken,extinct\n";

const LANGUAGE: &str = "glottocode,Name,iso_code,family,genus\n\
abcd1234,Alpha,alp,' Austronesian','Oceanic'\n\
efgh5678,Beta,,,\n\
abcd1234,Alpha duplicate,alq,Other,Other\n\
ijkl9012,Gamma,gam,,\n\
qrst7890,'O\\'Neill',,austronesian,oceanic\n";

const GEO: &str = "glottocode,name,latitude,longitude,macroarea,countrycodes\n\
abcd1234,Alpha,-9.5,147.1,Papunesia,PG\n\
efgh5678,Beta,,,Eurasia,'DE FR'\n";

/// Helper to write the three raw registries into a fresh directory.
fn create_sources(languoid: &str, language: &str, geo: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("languoid.csv"), languoid).expect("write languoid");
    fs::write(dir.path().join("language.csv"), language).expect("write language");
    fs::write(dir.path().join("languages-and-dialects-geo.csv"), geo).expect("write geo");
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read output")
}

// =============================================================================
// End-to-end Output Tests
// =============================================================================

#[test]
fn test_exports_expected_tables() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let out = TempDir::new().unwrap();

    let result = Pipeline::new()
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .expect("Pipeline failed");

    assert_eq!(
        read(&out.path().join("Families.csv")),
        "Family_ID,Family_Name\n1,austronesian\n2,unknown\n"
    );
    assert_eq!(
        read(&out.path().join("Genera.csv")),
        "Genus_ID,Genus_Name,Family_ID\n1,oceanic,1\n2,unknown,2\n"
    );
    assert_eq!(
        read(&out.path().join("Languages.csv")),
        "Language_ID,Language_Name,ISO_Code,Family_ID,Genus_ID,Status,Macroarea,Latitude,Longitude,Countrycodes\n\
         abcd1234,Alpha,alp,1,1,safe,Papunesia,-9.5,147.1,PG\n\
         efgh5678,Beta,,2,2,definitely endangered,Eurasia,,,DE FR\n\
         ijkl9012,Gamma,gam,2,2,unknown,,,,\n\
         qrst7890,O'Neill,,1,1,unknown,,,,\n"
    );
    assert_eq!(result.summary.written.len(), 3);
}

#[test]
fn test_duplicate_glottocode_keeps_first() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let out = TempDir::new().unwrap();
    let result = Pipeline::new()
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .unwrap();

    let languages = read(&out.path().join("Languages.csv"));
    let matching: Vec<&str> = languages.lines().filter(|l| l.starts_with("abcd1234,")).collect();
    assert_eq!(matching, vec!["abcd1234,Alpha,alp,1,1,safe,Papunesia,-9.5,147.1,PG"]);

    let language = &result.summary.sources[1];
    assert_eq!(language.source, SourceKind::Language);
    assert_eq!(language.duplicates_dropped, 1);
}

#[test]
fn test_missing_coordinates_keep_row() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let result = Pipeline::new().run(&SourcePaths::in_dir(sources.path())).unwrap();

    let beta = result
        .languages
        .rows
        .iter()
        .find(|r| r["Language_ID"].as_deref() == Some("efgh5678"))
        .expect("row kept");
    assert_eq!(beta["Latitude"], None);
    assert_eq!(beta["Longitude"], None);
    assert_eq!(beta["Macroarea"].as_deref(), Some("Eurasia"));
    assert_eq!(result.summary.geo_matches, 2);
}

#[test]
fn test_malformed_languoid_row_rejected_once() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let result = Pipeline::new().run(&SourcePaths::in_dir(sources.path())).unwrap();

    let rejected = result.rejected(SourceKind::Languoid);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].fields[0], "mnop3456");
    assert_eq!(result.summary.sources[0].rows_rejected, 1);
    assert_eq!(result.summary.sources[0].rows_loaded, 3);

    let languoids = &result.source(SourceKind::Languoid).unwrap().table;
    assert!(languoids.column_values("id").all(|id| id != Some("mnop3456")));
    assert!(result.rejected(SourceKind::Language).is_empty());
}

#[test]
fn test_unknown_family_and_genus_share_ids() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let result = Pipeline::new().run(&SourcePaths::in_dir(sources.path())).unwrap();

    let unknown_rows: Vec<_> = result
        .languages
        .rows
        .iter()
        .filter(|r| r["Family_Name"].as_deref() == Some("unknown"))
        .collect();
    assert_eq!(unknown_rows.len(), 2);
    for row in &unknown_rows {
        assert_eq!(row["Genus_Name"].as_deref(), Some("unknown"));
        assert_eq!(row["Family_ID"].as_deref(), Some("2"));
        assert_eq!(row["Genus_ID"].as_deref(), Some("2"));
    }
}

#[test]
fn test_unquoted_escapes_in_registry() {
    let language = "glottocode,Name,iso_code,family,genus\n\
abcd1234,Smith\\, Jones,alp,O\\'Family,back\\\\slash\n";
    let sources = create_sources(LANGUOID, language, GEO);
    let out = TempDir::new().unwrap();

    let result = Pipeline::new()
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .unwrap();

    assert!(result.rejected(SourceKind::Language).is_empty());
    let row = &result.languages.rows[0];
    assert_eq!(row["Language_Name"].as_deref(), Some("Smith, Jones"));
    assert_eq!(row["Family_Name"].as_deref(), Some("o'family"));
    assert_eq!(row["Genus_Name"].as_deref(), Some("back\\slash"));
    assert_eq!(read(&out.path().join("Families.csv")), "Family_ID,Family_Name\n1,o'family\n");
    assert!(read(&out.path().join("Languages.csv")).contains("abcd1234,\"Smith, Jones\",alp,1,1,safe"));
}

// =============================================================================
// Invariant Tests
// =============================================================================

#[test]
fn test_referential_integrity_of_exports() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let out = TempDir::new().unwrap();
    Pipeline::new()
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .unwrap();

    let reader = TableReader::new();
    let (families, _) = reader.read_path(&out.path().join("Families.csv"), "families").unwrap();
    let (genera, _) = reader.read_path(&out.path().join("Genera.csv"), "genera").unwrap();
    let (languages, _) = reader.read_path(&out.path().join("Languages.csv"), "languages").unwrap();

    let family_ids: Vec<_> = families.column_values("Family_ID").collect();
    let expected: Vec<String> = (1..=families.row_count()).map(|i| i.to_string()).collect();
    assert_eq!(family_ids, expected.iter().map(|s| Some(s.as_str())).collect::<Vec<_>>());

    for row in &languages.rows {
        let family_id = row["Family_ID"].as_deref().unwrap();
        let genus_id = row["Genus_ID"].as_deref().unwrap();
        assert!(family_ids.contains(&Some(family_id)));
        let genus = genera
            .rows
            .iter()
            .find(|g| g["Genus_ID"].as_deref() == Some(genus_id))
            .expect("genus exists");
        assert_eq!(genus["Family_ID"].as_deref(), Some(family_id));
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let out = TempDir::new().unwrap();
    let paths = SourcePaths::in_dir(sources.path());
    let pipeline = Pipeline::new();

    pipeline.run_and_export(&paths, out.path()).unwrap();
    let first: Vec<String> = ["Families.csv", "Genera.csv", "Languages.csv"]
        .iter()
        .map(|f| read(&out.path().join(f)))
        .collect();

    pipeline.run_and_export(&paths, out.path()).unwrap();
    let second: Vec<String> = ["Families.csv", "Genera.csv", "Languages.csv"]
        .iter()
        .map(|f| read(&out.path().join(f)))
        .collect();

    assert_eq!(first, second);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_missing_source_is_fatal_and_writes_nothing() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    fs::remove_file(sources.path().join("languages-and-dialects-geo.csv")).unwrap();
    let out = TempDir::new().unwrap();

    let err = Pipeline::new()
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .unwrap_err();

    match &err {
        LangbaseError::Source { source_name, .. } => assert_eq!(source_name, "geo"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("languages-and-dialects-geo.csv"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_required_column_names_source() {
    let sources = create_sources(LANGUOID, "glottocode,Name\nabcd1234,Alpha\n", GEO);
    let err = Pipeline::new()
        .run(&SourcePaths::in_dir(sources.path()))
        .unwrap_err();
    assert!(matches!(err, LangbaseError::Source { ref source_name, .. } if source_name == "language"));
    assert!(err.to_string().contains("iso_code"));
}

// =============================================================================
// Optional Output Tests
// =============================================================================

#[test]
fn test_preprocessed_and_rates_exports() {
    let sources = create_sources(LANGUOID, LANGUAGE, GEO);
    let out = TempDir::new().unwrap();
    let config = PipelineConfig {
        keep_preprocessed: true,
        write_rates: true,
        ..PipelineConfig::default()
    };

    let result = Pipeline::with_config(config)
        .run_and_export(&SourcePaths::in_dir(sources.path()), out.path())
        .unwrap();

    assert_eq!(result.summary.written.len(), 7);
    assert_eq!(
        read(&out.path().join("preprocessed_language.csv")),
        "glottocode,Name,iso_code,family,genus\n\
         abcd1234,Alpha,alp, Austronesian,Oceanic\n\
         efgh5678,Beta,,,\n\
         abcd1234,Alpha duplicate,alq,Other,Other\n\
         ijkl9012,Gamma,gam,,\n\
         qrst7890,O'Neill,,austronesian,oceanic\n"
    );
    assert_eq!(
        read(&out.path().join("Endangerment_Rates.csv")),
        "Family_Name,Genus_Name,Total_Languages,Endangered_Languages,Endangerment_Rate_Percentage\n\
         unknown,unknown,2,1,50.00\n\
         austronesian,oceanic,2,0,0.00\n"
    );
}
