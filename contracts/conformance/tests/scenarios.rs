//! End-to-end conformance runs over synthetic source roots

use nifikit_conformance::{
    ConformanceConfig, ConformanceReport, ConformanceRunner, Verdict, ViolationKind,
};
use nifikit_host_api::{
    FlowFile, FlowFileSource, FlowFileSourceResult, FlowFileTransform, FlowFileTransformResult,
    HostEnvironment, HostModule, ImportError, ModuleExports, ModuleLoader, ModuleRegistry, PluginClass,
    PluginVariant, ProcessContext, Processor, ProcessorDetails, ProcessorError,
    PropertyDescriptor, Record, RecordTransform, RecordTransformResult, Relationship,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Plugins
// ---------------------------------------------------------------------------

/// Transform routing to a fixed relationship
struct Fixed {
    relationships: &'static [&'static str],
    route: &'static str,
    properties: Option<Vec<PropertyDescriptor>>,
}

impl Processor for Fixed {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        self.relationships
            .iter()
            .map(|name| Relationship::new(*name, "").map_err(ProcessorError::from))
            .collect()
    }

    fn property_descriptors(&self) -> Option<Vec<PropertyDescriptor>> {
        self.properties.clone()
    }
}

impl FlowFileTransform for Fixed {
    fn transform(
        &self,
        _context: &dyn ProcessContext,
        _flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        Ok(Some(FlowFileTransformResult::new(
            self.route,
            Some(b"ok".into()),
            json!({}),
        )?))
    }
}

fn good(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Ok(Box::new(Fixed {
        relationships: &["success", "failure"],
        route: "success",
        properties: None,
    }))
}

fn failure_only(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Ok(Box::new(Fixed {
        relationships: &["failure"],
        route: "failure",
        properties: None,
    }))
}

fn undeclared_route(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Ok(Box::new(Fixed {
        relationships: &["success", "failure"],
        route: "original",
        properties: None,
    }))
}

fn bad_property(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Ok(Box::new(Fixed {
        relationships: &["success"],
        route: "success",
        properties: Some(vec![
            PropertyDescriptor::named("HOST").required(true),
            PropertyDescriptor::named("PORT").attribute("required", "yes"),
        ]),
    }))
}

fn refuses(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Err(ProcessorError::MissingConfiguration("jvm gateway".into()))
}

fn gateway_down(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    let gateway: Option<Box<dyn FlowFileTransform>> = None;
    Ok(gateway.expect("gateway not configured"))
}

struct Exploding;

impl Processor for Exploding {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![Relationship::success("")])
    }
}

impl FlowFileTransform for Exploding {
    fn transform(
        &self,
        _context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        let text = String::from_utf8(flowfile.contents())
            .map_err(|e| ProcessorError::processing(e.to_string()))?;
        // text content is rejected by the transform result constructor
        Ok(Some(FlowFileTransformResult::new(
            "success",
            Some(text.into()),
            json!(null),
        )?))
    }
}

fn exploding(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
    Ok(Box::new(Exploding))
}

struct Ticker;

impl Processor for Ticker {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![Relationship::success("tick")])
    }
}

impl FlowFileSource for Ticker {
    fn create(
        &self,
        _context: &dyn ProcessContext,
    ) -> Result<Option<FlowFileSourceResult>, ProcessorError> {
        Ok(None)
    }
}

fn ticker(_env: &HostEnvironment) -> Result<Box<dyn FlowFileSource>, ProcessorError> {
    Ok(Box::new(Ticker))
}

struct Swallow;

impl Processor for Swallow {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![Relationship::success("")])
    }
}

impl RecordTransform for Swallow {
    fn transform(
        &self,
        _context: &dyn ProcessContext,
        _record: &Record,
    ) -> Result<Option<RecordTransformResult>, ProcessorError> {
        Ok(None)
    }
}

fn swallow(_env: &HostEnvironment) -> Result<Box<dyn RecordTransform>, ProcessorError> {
    Ok(Box::new(Swallow))
}

fn details() -> ProcessorDetails {
    ProcessorDetails::new("0.1", "x")
}

const TRANSFORM: &str = "transform(self, context, flowfile)";

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

fn load_good(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    env.import("nifiapi.relationship", "Relationship")?;
    Ok(ModuleExports::new()
        .class(PluginClass::transform("Good", "plugins.good", TRANSFORM, good).with_details(details())))
}

fn load_failure_only(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("FailureOnly", "plugins.failure_only", TRANSFORM, failure_only)
            .with_details(details()),
    ))
}

fn load_two_args(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("TwoArgs", "plugins.two_args", "transform(self, flowfile)", good)
            .with_details(details()),
    ))
}

fn load_ticker(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfilesource", "FlowFileSource")?;
    Ok(ModuleExports::new().class(
        PluginClass::source("Ticker", "plugins.ticker", "create(self, context)", ticker)
            .with_details(details()),
    ))
}

fn load_swallow(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.recordtransform", "RecordTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::record_transform(
            "Swallow",
            "plugins.swallow",
            "transform(self, context, record)",
            swallow,
        )
        .with_details(details()),
    ))
}

fn load_package_root(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    // re-exports Good from plugins.good
    load_good(env)
}

fn load_helpers(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    Ok(ModuleExports::new())
}

fn load_bad_import(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.properties", "PropertyDependency")?;
    Ok(ModuleExports::new())
}

fn load_bad_property(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.properties", "PropertyDescriptor")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("BadProperty", "plugins.bad_property", TRANSFORM, bad_property)
            .with_details(details()),
    ))
}

fn load_undeclared(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("Wanderer", "plugins.undeclared", TRANSFORM, undeclared_route)
            .with_details(details()),
    ))
}

fn load_refuses(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("Refuses", "plugins.refuses", TRANSFORM, refuses)
            .with_details(details()),
    ))
}

fn load_exploding(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("Exploding", "plugins.exploding", TRANSFORM, exploding)
            .with_details(details()),
    ))
}

fn load_gateway_down(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(
        PluginClass::transform("GatewayDown", "plugins.gateway_down", TRANSFORM, gateway_down)
            .with_details(details()),
    ))
}

fn load_panicking(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    panic!("module init failed")
}

fn load_undocumented(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    Ok(ModuleExports::new().class(PluginClass::transform(
        "Undocumented",
        "plugins.undocumented",
        TRANSFORM,
        good,
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Source root containing one file per module id
fn source_root(ids: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for id in ids {
        let path = match id.split_once('.') {
            Some((package, file)) => dir.path().join(package).join(format!("{file}.rs")),
            None => dir.path().join(id).join("mod.rs"),
        };
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }
    dir
}

fn registry(modules: &[(&str, ModuleLoader)]) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    for (id, loader) in modules {
        registry.register(*id, *loader);
    }
    registry
}

fn run(root: &Path, registry: &ModuleRegistry) -> ConformanceReport {
    let config = ConformanceConfig::default().with_src_root(root);
    ConformanceRunner::new(config)
        .run(&HostEnvironment::stub(), registry)
        .unwrap()
}

fn single(ids: &[&str], modules: &[(&str, ModuleLoader)]) -> ConformanceReport {
    let root = source_root(ids);
    run(root.path(), &registry(modules))
}

fn only_violation(report: &ConformanceReport) -> (ViolationKind, String) {
    let violations: Vec<_> = report.violations().collect();
    assert_eq!(violations.len(), 1, "{}", report.to_text());
    (violations[0].kind, violations[0].reason.clone())
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn conformant_transform_passes() {
    let report = single(&["plugins.good"], &[("plugins.good", load_good)]);

    assert_eq!(report.verdict(), Verdict::Conformant);
    assert_eq!(report.entries.len(), 1);
    let entry = &report.entries[0];
    assert_eq!(entry.identity(), "plugins.good.Good");
    assert_eq!(entry.variant, Some(PluginVariant::Transform));
    assert_eq!(entry.details["relationships"], "failure, success");
    assert_eq!(
        entry.details["smoke"],
        "relationship=success, contents_len=2, attrs=[]"
    );
}

#[test]
fn missing_success_relationship_fails() {
    let report = single(
        &["plugins.failure_only"],
        &[("plugins.failure_only", load_failure_only)],
    );

    assert_eq!(report.verdict(), Verdict::NonConformant);
    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Relationship);
    assert!(reason.contains("success"));
}

#[test]
fn wrong_entry_signature_fails() {
    let report = single(&["plugins.two_args"], &[("plugins.two_args", load_two_args)]);

    assert_eq!(report.verdict(), Verdict::NonConformant);
    assert_eq!(only_violation(&report).0, ViolationKind::Signature);
}

#[test]
fn source_returning_nothing_passes() {
    let report = single(&["plugins.ticker"], &[("plugins.ticker", load_ticker)]);

    assert_eq!(report.verdict(), Verdict::Conformant);
    assert_eq!(report.entries[0].variant, Some(PluginVariant::Source));
}

#[test]
fn record_transform_returning_nothing_fails() {
    let report = single(&["plugins.swallow"], &[("plugins.swallow", load_swallow)]);

    assert_eq!(report.verdict(), Verdict::NonConformant);
    assert_eq!(only_violation(&report).0, ViolationKind::Smoke);
    assert_eq!(report.entries[0].variant, Some(PluginVariant::RecordTransform));
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn empty_root_finds_no_modules() {
    let report = single(&[], &[]);
    assert_eq!(report.verdict(), Verdict::NoModulesFound);
    assert!(report.warnings.is_empty());
}

#[test]
fn missing_root_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(&dir.path().join("absent"), &ModuleRegistry::new());

    assert_eq!(report.verdict(), Verdict::NoModulesFound);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("not found"));
}

#[test]
fn modules_without_plugins() {
    let report = single(&["plugins.helpers"], &[("plugins.helpers", load_helpers)]);
    assert_eq!(report.verdict(), Verdict::NoPluginsFound);
    assert_eq!(report.summary.modules, 1);
}

#[test]
fn import_failures_are_recorded_and_do_not_stop_the_run() {
    let report = single(
        &["plugins.bad_import", "plugins.unregistered", "plugins.good"],
        &[
            ("plugins.bad_import", load_bad_import),
            ("plugins.good", load_good),
        ],
    );

    assert_eq!(report.verdict(), Verdict::NonConformant);
    assert_eq!(report.summary.modules, 3);
    assert_eq!(report.summary.plugins, 1);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.summary.failed, 2);

    let failed: Vec<String> = report
        .entries
        .iter()
        .filter(|e| !e.is_pass())
        .map(|e| e.identity())
        .collect();
    assert_eq!(failed, vec!["plugins.bad_import", "plugins.unregistered"]);
    assert!(report
        .violations()
        .all(|v| v.kind == ViolationKind::Import));
}

#[test]
fn reexported_classes_are_checked_once() {
    let report = single(
        &["plugins", "plugins.good"],
        &[("plugins", load_package_root), ("plugins.good", load_good)],
    );

    assert_eq!(report.verdict(), Verdict::Conformant);
    assert_eq!(report.summary.modules, 2);
    assert_eq!(report.summary.plugins, 1);
}

#[test]
fn malformed_property_fails() {
    let report = single(
        &["plugins.bad_property"],
        &[("plugins.bad_property", load_bad_property)],
    );

    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Property);
    assert!(reason.contains("PORT"));
}

#[test]
fn undeclared_smoke_route_fails() {
    let report = single(
        &["plugins.undeclared"],
        &[("plugins.undeclared", load_undeclared)],
    );

    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Smoke);
    assert!(reason.contains("original"));
}

#[test]
fn failed_instantiation_is_construction_violation() {
    let report = single(&["plugins.refuses"], &[("plugins.refuses", load_refuses)]);
    assert_eq!(only_violation(&report).0, ViolationKind::Construction);
}

#[test]
fn construction_error_inside_entry_method_is_smoke_violation() {
    let report = single(&["plugins.exploding"], &[("plugins.exploding", load_exploding)]);

    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Smoke);
    assert!(reason.contains("bytes or None"));
}

#[test]
fn missing_details_is_metadata_violation() {
    let report = single(
        &["plugins.undocumented"],
        &[("plugins.undocumented", load_undocumented)],
    );
    assert_eq!(only_violation(&report).0, ViolationKind::Metadata);
}

#[test]
fn uninstalled_environment_fails_imports() {
    let root = source_root(&["plugins.good"]);
    let config = ConformanceConfig::default().with_src_root(root.path());
    let report = ConformanceRunner::new(config)
        .run(&HostEnvironment::new(), &registry(&[("plugins.good", load_good)]))
        .unwrap();

    assert_eq!(only_violation(&report).0, ViolationKind::Import);
}

#[test]
fn every_failure_is_reported() {
    let report = single(
        &[
            "plugins.good",
            "plugins.failure_only",
            "plugins.two_args",
            "plugins.ticker",
            "plugins.swallow",
        ],
        &[
            ("plugins.good", load_good),
            ("plugins.failure_only", load_failure_only),
            ("plugins.two_args", load_two_args),
            ("plugins.ticker", load_ticker),
            ("plugins.swallow", load_swallow),
        ],
    );

    assert_eq!(report.summary.plugins, 5);
    assert_eq!(report.summary.passed, 2);
    assert_eq!(report.summary.failed, 3);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["summary"]["verdict"], "non_conformant");
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(5));
}

#[test]
fn panicking_constructor_does_not_stop_the_run() {
    let report = single(
        &["plugins.gateway_down", "plugins.good"],
        &[
            ("plugins.gateway_down", load_gateway_down),
            ("plugins.good", load_good),
        ],
    );

    assert_eq!(report.verdict(), Verdict::NonConformant);
    assert_eq!(report.summary.plugins, 2);
    assert_eq!(report.summary.passed, 1);

    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Construction);
    assert!(reason.contains("gateway not configured"));
}

#[test]
fn panicking_loader_is_an_import_failure() {
    let report = single(
        &["plugins.good", "plugins.panicking"],
        &[
            ("plugins.good", load_good),
            ("plugins.panicking", load_panicking),
        ],
    );

    assert_eq!(report.summary.modules, 2);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.summary.failed, 1);

    let (kind, reason) = only_violation(&report);
    assert_eq!(kind, ViolationKind::Import);
    assert!(reason.contains("module init failed"));
}

#[test]
fn reinstalled_environment_gives_identical_runs() {
    let root = source_root(&["plugins.good", "plugins.ticker"]);
    let registry = registry(&[
        ("plugins.good", load_good),
        ("plugins.ticker", load_ticker),
    ]);
    let runner = ConformanceRunner::new(ConformanceConfig::default().with_src_root(root.path()));

    let mut env = HostEnvironment::stub();
    let first = runner.run(&env, &registry).unwrap();

    // stale host bindings left behind between runs
    env.bind(HostModule::new("nifiapi.flowfiletransform", Vec::<String>::new()));
    env.bind(HostModule::new("nifiapi.legacy", ["FlowFileTransform"]));
    env.install();

    let second = runner.run(&env, &registry).unwrap();

    assert!(!env.is_bound("nifiapi.legacy"));
    assert_eq!(first.verdict(), Verdict::Conformant);
    assert_eq!(second.verdict(), first.verdict());

    let outcome = |report: &ConformanceReport| -> Vec<(String, bool, Vec<(String, String)>)> {
        let mut entries: Vec<_> = report
            .entries
            .iter()
            .map(|e| {
                let details = e.details.clone().into_iter().collect();
                (e.identity(), e.is_pass(), details)
            })
            .collect();
        entries.sort();
        entries
    };
    assert_eq!(outcome(&second), outcome(&first));
}
