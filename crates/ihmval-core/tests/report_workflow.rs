use ihmval::core::io::cif::CifFile;
use ihmval::core::io::molprobity::MolprobityExport;
use ihmval::core::io::traits::TextFormat;
use ihmval::core::models::analysis::GeometryAnalysisResult;
use ihmval::core::models::scattering::SasSummary;
use ihmval::engine::config::{ReportConfig, ReportConfigBuilder};
use ihmval::engine::error::{EngineError, RemoteFetchError};
use ihmval::engine::progress::{Progress, ProgressReporter};
use ihmval::engine::scattering::ScatteringSource;
use ihmval::workflows::report;
use std::path::PathBuf;
use std::sync::Mutex;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[derive(Default)]
struct RecordingSource {
    summaries: Mutex<Vec<String>>,
    profiles: Mutex<Vec<String>>,
}

impl ScatteringSource for RecordingSource {
    fn fetch_summary(&self, code: &str) -> Result<SasSummary, RemoteFetchError> {
        self.summaries.lock().unwrap().push(code.to_string());
        Ok(SasSummary {
            intensities_data: format!("https://sasbdb.test/media/intensities/{code}.dat"),
            experiment_description: Some(format!("{code}: Nup84 in HEPES buffer")),
            estimated_volume: Some(412.0),
            estimated_volume_method: Some("DAMMIF".to_string()),
            porod_volume: Some(530.5),
        })
    }

    fn fetch_profile(&self, url: &str) -> Result<String, RemoteFetchError> {
        self.profiles.lock().unwrap().push(url.to_string());
        Ok("Sample: Nup84\nUnits: 1/nm\nBuffer: HEPES\nQ I E\n\
            0.1 10.0 1.0\n0.2 6.0 0.4\n\n0.3 2.5 0.2\n"
            .to_string())
    }
}

fn geometry_export() -> MolprobityExport {
    MolprobityExport::read_from_path(fixture("geometry_result.json")).unwrap()
}

fn run_report(
    geometry: Option<&dyn GeometryAnalysisResult>,
    source: &RecordingSource,
    config: &ReportConfig,
) -> Result<ihmval::engine::compose::ReportDocument, EngineError> {
    let document = CifFile::read_from_path(fixture("PDBDEV_test.cif")).unwrap();
    report::run(&document, geometry, source, config, &ProgressReporter::new())
}

#[test]
fn full_report_merges_metadata_geometry_and_scattering() {
    let source = RecordingSource::default();
    let export = geometry_export();
    let doc = run_report(Some(&export), &source, &ReportConfig::default()).unwrap();

    assert_eq!(doc.id, "PDBDEVtest");
    assert_eq!(doc.id_t, "PDBDEV_test");
    assert_eq!(doc.id_w, vec!["PDBDEVtest"]);
    assert_eq!(doc.id_r, vec!["PDBDEV_test"]);
    assert_eq!(doc.molecule, "Nup84 heptameric subcomplex");
    assert_eq!(doc.title, "Molecular architecture of the Nup84 complex");
    assert_eq!(doc.authors, "AA B; CC D");

    assert_eq!(doc.number_of_molecules, 2);
    assert_eq!(doc.num_chains, 2.0);
    assert_eq!(
        doc.model_names,
        vec!["Cluster 1 centroid", "Cluster 2 centroid"]
    );
    assert_eq!(doc.number_of_models, 2);
    assert_eq!(doc.number_of_groups, 2);
    assert_eq!(doc.num_ensembles, 2);
    assert_eq!(doc.sphere, 1);
    assert_eq!(doc.rigid_body, 2);
    assert_eq!(doc.flexible_unit, 1);

    assert_eq!(
        doc.subunits,
        vec![
            "Nup84: chain A (726 residues)",
            "Nup85: chain B (744 residues)"
        ]
    );
    assert_eq!(
        doc.datasets,
        vec![
            "SAS data, SASBDB: SASDA12",
            "CX-MS data, PRIDE: PXD001",
            "SAS data, SASBDB: SASDB34"
        ]
    );
    assert_eq!(doc.data, vec!["SAS data", "CX-MS data"]);
    assert_eq!(
        doc.soft_list,
        vec!["Integrative Modeling Platform (IMP) (version 2.8)", "PMI"]
    );
    assert_eq!(doc.number_of_software, 2);
    assert_eq!(doc.protocols_number, 1);
    assert_eq!(
        doc.protocols,
        vec![
            "Sampling (Replica exchange Monte Carlo)",
            "Refinement (Conjugate gradients)"
        ]
    );

    let geometry = doc.geometry.as_ref().unwrap();
    assert_eq!(geometry.clash.clashscore, 3.25);
    assert_eq!(geometry.clash.clashes_list[0].overlap, 0.52);
    assert_eq!(geometry.clash.clashes_list[0].atom1.residue_id, "12");
    assert_eq!(geometry.bonds.total, 11870);
    assert_eq!(geometry.bonds.outliers, 0);
    assert_eq!(geometry.angles.outliers, 1);
    assert_eq!(geometry.ramachandran.outliers, 1);
    assert_eq!(geometry.ramachandran.favored, 1);
    assert_eq!(geometry.ramachandran.allowed, 1);

    let sas = doc.sas.as_ref().unwrap();
    assert_eq!(sas.primary_code, "SASDA12");
    assert_eq!(sas.profile.len(), 3);
    assert_eq!(sas.parameters.porod_volume, "530.5 nm\u{00B3}");
    assert_eq!(doc.sas_summaries, vec!["SASDA12", "SASDB34"]);

    let mut fetched = source.summaries.lock().unwrap().clone();
    fetched.sort();
    assert_eq!(fetched, vec!["SASDA12", "SASDB34"]);
    assert_eq!(
        *source.profiles.lock().unwrap(),
        vec!["https://sasbdb.test/media/intensities/SASDA12.dat"]
    );
}

#[test]
fn identical_inputs_yield_byte_identical_json() {
    let export = geometry_export();
    let config = ReportConfig::default();
    let first = run_report(Some(&export), &RecordingSource::default(), &config)
        .unwrap()
        .to_json()
        .unwrap();
    let second = run_report(Some(&export), &RecordingSource::default(), &config)
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn disabled_scattering_fetch_touches_no_source() {
    let source = RecordingSource::default();
    let config = ReportConfigBuilder::new()
        .scattering_marker("SAS")
        .title_placeholder("Title not available")
        .fetch_scattering(false)
        .allow_partial_geometry(false)
        .build()
        .unwrap();
    let doc = run_report(None, &source, &config).unwrap();
    assert!(doc.sas.is_none());
    assert!(doc.sas_summaries.is_empty());
    assert!(doc.geometry.is_none());
    assert!(source.summaries.lock().unwrap().is_empty());
}

#[test]
fn incomplete_geometry_fails_unless_partial_results_are_allowed() {
    let mut export = geometry_export();
    export.data.rotalyze = None;

    let err = run_report(Some(&export), &RecordingSource::default(), &ReportConfig::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::IncompleteAnalysisInput { .. }));

    let lenient = ReportConfig {
        allow_partial_geometry: true,
        ..ReportConfig::default()
    };
    let doc = run_report(Some(&export), &RecordingSource::default(), &lenient).unwrap();
    assert!(doc.geometry.is_none());
    assert!(doc.sas.is_some());
}

#[test]
fn sections_are_reported_in_pipeline_order() {
    let sections = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event| {
        if let Progress::SectionStart { name } = event {
            sections.lock().unwrap().push(name);
        }
    }));
    let document = CifFile::read_from_path(fixture("PDBDEV_test.cif")).unwrap();
    report::run(
        &document,
        None,
        &RecordingSource::default(),
        &ReportConfig::default(),
        &reporter,
    )
    .unwrap();
    drop(reporter);
    assert_eq!(
        sections.into_inner().unwrap(),
        vec!["Metadata", "Geometry", "Scattering", "Composition"]
    );
}

#[test]
fn run_from_files_reads_both_inputs() {
    let doc = report::run_from_files(
        &fixture("PDBDEV_test.cif"),
        Some(&fixture("geometry_result.json")),
        &RecordingSource::default(),
        &ReportConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();
    assert!(doc.geometry.is_some());
    assert_eq!(doc.id, "PDBDEVtest");
}
