use std::f64::consts::FRAC_PI_2;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use spool_mesh::fitting::{
    BendParameters, BranchStub, CylinderCaps, FlangeCatalog, FlangeKind, GeometryConfig, PipeCrossSection,
    SpoolItem, build_branch_stub, build_continuous_bend, build_flange, build_hollow_cylinder,
    build_mitered_bend, build_retaining_ring, build_spool, build_weld_ring, merge_spool_meshes,
};
use spool_mesh::geom::{GeomMesh, GeomMeshDiagnostics, Point3, SaddleAxis, Transform, Vec3};

const SNAPSHOT_QUANTIZE: f64 = 1e-6;
const SNAPSHOT_DECIMALS: usize = 6;

const USAGE: &str = r"spool_cli (spool-mesh)

USAGE:
  spool_cli list
  spool_cli run <scenario|all> [options]

SCENARIOS:
  straight_run
  continuous_bend
  mitered_bend
  weld_ring
  flange_standard
  flange_blank
  flange_rotating
  branch_stub
  nozzle
  spool

OPTIONS (run):
  --out-dir <dir>     Write <scenario>.snap to this dir (required for `all`)
  --snap <path>       Write the snapshot (single scenario only)
  --config <file>     GeometryConfig JSON; missing fields keep their defaults
  --catalog <file>    Flange catalog JSON (array of entries)
  --overwrite         Overwrite existing output files
  -h, --help          Show this help
";

fn main() {
    if let Err(err) = run() {
        eprintln!("spool_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::new(args);

    let Some(command) = args.next() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "list" => {
            for scenario in Scenario::ALL {
                println!("{}", scenario.name());
            }
            Ok(())
        }
        "run" => cmd_run(&mut args),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

/// Inputs shared by every scenario.
struct Context {
    config: GeometryConfig,
    catalog: FlangeCatalog,
}

fn cmd_run(args: &mut Args) -> Result<(), String> {
    let scenario_name = args.next().ok_or("missing scenario name")?;

    let mut out_dir: Option<PathBuf> = None;
    let mut snap_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut catalog_path: Option<PathBuf> = None;
    let mut overwrite = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
            "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
            "--config" => config_path = Some(PathBuf::from(args.value("--config")?)),
            "--catalog" => catalog_path = Some(PathBuf::from(args.value("--catalog")?)),
            "--overwrite" => overwrite = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    let context = Context {
        config: load_config(config_path.as_deref())?,
        catalog: load_catalog(catalog_path.as_deref())?,
    };

    if let Some(dir) = out_dir.as_ref() {
        if snap_path.is_some() {
            return Err("use either --out-dir or --snap (not both)".to_string());
        }
        fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

        if scenario_name == "all" {
            for scenario in Scenario::ALL {
                run_one_scenario_to_dir(*scenario, &context, dir, overwrite)?;
            }
            return Ok(());
        }
        let scenario = Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        return run_one_scenario_to_dir(scenario, &context, dir, overwrite);
    }

    if scenario_name == "all" {
        return Err("`run all` requires --out-dir".to_string());
    }

    let scenario = Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
    let output = run_scenario(scenario, &context)?;

    if let Some(path) = snap_path.as_deref() {
        write_text_file(path, &output.snapshot, overwrite)?;
        eprintln!("wrote {}", path.display());
    } else {
        print!("{}", output.snapshot);
    }

    report(&output);
    Ok(())
}

fn run_one_scenario_to_dir(scenario: Scenario, context: &Context, dir: &Path, overwrite: bool) -> Result<(), String> {
    let output = run_scenario(scenario, context)?;

    let path = dir.join(format!("{}.snap", output.name));
    write_text_file(&path, &output.snapshot, overwrite)?;
    eprintln!("wrote {}", path.display());

    report(&output);
    Ok(())
}

fn report(output: &ScenarioOutput) {
    eprintln!(
        "{}: vertices={} triangles={} | {}",
        output.name,
        output.mesh.vertex_count(),
        output.mesh.triangle_count(),
        output.diagnostics.summary()
    );
}

fn load_config(path: Option<&Path>) -> Result<GeometryConfig, String> {
    let Some(path) = path else {
        return Ok(GeometryConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    let config: GeometryConfig =
        serde_json::from_str(&text).map_err(|e| format!("parse config {}: {e}", path.display()))?;
    config.validate().map_err(|e| format!("config {}: {e}", path.display()))?;
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> Result<FlangeCatalog, String> {
    let Some(path) = path else {
        return Ok(FlangeCatalog::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parse catalog {}: {e}", path.display()))
}

fn unknown_scenario(name: &str) -> String {
    let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
    for scenario in Scenario::ALL {
        let _ = writeln!(msg, "  {}", scenario.name());
    }
    msg
}

fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
    refuse_overwrite(path, overwrite)?;
    fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
}

fn refuse_overwrite(path: &Path, overwrite: bool) -> Result<(), String> {
    if path.exists() && !overwrite {
        return Err(format!(
            "refusing to overwrite existing file {} (use --overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
    }
    Ok(())
}

fn normalize_snapshot_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    if normalized.ends_with('\n') {
        normalized
    } else {
        format!("{normalized}\n")
    }
}

fn quantize_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
    if q == 0.0 { 0.0 } else { q }
}

fn write_f64(out: &mut String, value: f64) {
    let value = quantize_f64(value);
    let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
}

fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
    let _ = write!(out, "{prefix} ");
    write_f64(out, v[0]);
    out.push(' ');
    write_f64(out, v[1]);
    out.push(' ');
    write_f64(out, v[2]);
    out.push('\n');
}

/// FNV-1a over the quantized positions and the index buffer.
fn mesh_checksum(mesh: &GeomMesh) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    let mut feed = |bytes: &[u8]| {
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
    };
    for p in &mesh.positions {
        for value in p {
            #[allow(clippy::cast_possible_truncation)]
            let ticks = (quantize_f64(*value) / SNAPSHOT_QUANTIZE).round() as i64;
            feed(&ticks.to_le_bytes());
        }
    }
    for index in &mesh.indices {
        feed(&index.to_le_bytes());
    }
    hash
}

fn write_geom_mesh_diagnostics(out: &mut String, diag: &GeomMeshDiagnostics) {
    let _ = writeln!(out, "mesh_diag.vertex_count {}", diag.vertex_count);
    let _ = writeln!(out, "mesh_diag.triangle_count {}", diag.triangle_count);
    let _ = writeln!(out, "mesh_diag.group_count {}", diag.group_count);
    let _ = writeln!(out, "mesh_diag.coincident_vertex_count {}", diag.coincident_vertex_count);
    let _ = writeln!(
        out,
        "mesh_diag.degenerate_triangle_count {}",
        diag.degenerate_triangle_count
    );
    let _ = writeln!(out, "mesh_diag.open_edge_count {}", diag.open_edge_count);
    let _ = writeln!(
        out,
        "mesh_diag.non_manifold_edge_count {}",
        diag.non_manifold_edge_count
    );
    let _ = writeln!(out, "mesh_diag.non_finite_vertex_count {}", diag.non_finite_vertex_count);
    let _ = writeln!(out, "mesh_diag.warning_count {}", diag.warnings.len());
    for (idx, warning) in diag.warnings.iter().enumerate() {
        let _ = writeln!(out, "mesh_diag.warning.{idx} {warning}");
    }
}

fn write_mesh_summary(out: &mut String, mesh: &GeomMesh) {
    let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
    let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
    let _ = writeln!(out, "mesh.groups {}", mesh.groups.len());
    for group in &mesh.groups {
        let _ = writeln!(
            out,
            "g {} {}..{} {}..{}",
            group.kind.label(),
            group.vertices.start,
            group.vertices.end,
            group.indices.start,
            group.indices.end
        );
    }
    match mesh.bbox() {
        Some(bbox) => {
            write_vec3_line(out, "bbox.min", bbox.min.to_array());
            write_vec3_line(out, "bbox.max", bbox.max.to_array());
        }
        None => {
            let _ = writeln!(out, "bbox none");
        }
    }
    let _ = writeln!(out, "mesh.checksum {:016x}", mesh_checksum(mesh));
}

fn snapshot(name: &str, mesh: &GeomMesh, diag: &GeomMeshDiagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# spool-mesh snapshot v1");
    let _ = writeln!(out, "scenario {name}");
    let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
    write_geom_mesh_diagnostics(&mut out, diag);
    write_mesh_summary(&mut out, mesh);
    normalize_snapshot_text(&out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    StraightRun,
    ContinuousBend,
    MiteredBend,
    WeldRing,
    FlangeStandard,
    FlangeBlank,
    FlangeRotating,
    BranchStub,
    Nozzle,
    Spool,
}

impl Scenario {
    const ALL: &'static [Scenario] = &[
        Scenario::StraightRun,
        Scenario::ContinuousBend,
        Scenario::MiteredBend,
        Scenario::WeldRing,
        Scenario::FlangeStandard,
        Scenario::FlangeBlank,
        Scenario::FlangeRotating,
        Scenario::BranchStub,
        Scenario::Nozzle,
        Scenario::Spool,
    ];

    fn name(self) -> &'static str {
        match self {
            Scenario::StraightRun => "straight_run",
            Scenario::ContinuousBend => "continuous_bend",
            Scenario::MiteredBend => "mitered_bend",
            Scenario::WeldRing => "weld_ring",
            Scenario::FlangeStandard => "flange_standard",
            Scenario::FlangeBlank => "flange_blank",
            Scenario::FlangeRotating => "flange_rotating",
            Scenario::BranchStub => "branch_stub",
            Scenario::Nozzle => "nozzle",
            Scenario::Spool => "spool",
        }
    }

    fn from_str(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
    }
}

struct ScenarioOutput {
    name: &'static str,
    mesh: GeomMesh,
    diagnostics: GeomMeshDiagnostics,
    snapshot: String,
}

fn run_scenario(scenario: Scenario, context: &Context) -> Result<ScenarioOutput, String> {
    let mesh = match scenario {
        Scenario::StraightRun => scenario_straight_run(context),
        Scenario::ContinuousBend => scenario_continuous_bend(context),
        Scenario::MiteredBend => scenario_mitered_bend(context),
        Scenario::WeldRing => scenario_weld_ring(context),
        Scenario::FlangeStandard => scenario_flange(context, FlangeKind::Standard),
        Scenario::FlangeBlank => scenario_flange(context, FlangeKind::Blank),
        Scenario::FlangeRotating => scenario_flange(context, FlangeKind::Rotating),
        Scenario::BranchStub => scenario_branch_stub(context, Some(150.0)),
        Scenario::Nozzle => scenario_branch_stub(context, None),
        Scenario::Spool => scenario_spool(context),
    }?;
    mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

    let name = scenario.name();
    let diagnostics = mesh.diagnostics();
    let snapshot = snapshot(name, &mesh, &diagnostics);
    Ok(ScenarioOutput {
        name,
        mesh,
        diagnostics,
        snapshot,
    })
}

fn nb150_section(context: &Context) -> Result<PipeCrossSection, String> {
    PipeCrossSection::from_nominal_bore(150.0, None, &context.config).map_err(|e| e.to_string())
}

fn scenario_straight_run(context: &Context) -> Result<GeomMesh, String> {
    let mesh = build_hollow_cylinder(
        Point3::ORIGIN,
        Point3::new(0.0, 1000.0, 0.0),
        30.0,
        25.0,
        CylinderCaps::BOTH,
        &context.config,
    )
    .map_err(|e| e.to_string())?;
    Ok(context.config.to_scene(&mesh))
}

fn quarter_bend(segment_count: usize) -> BendParameters {
    BendParameters {
        center: Point3::ORIGIN,
        radius: 500.0,
        start_angle: 0.0,
        end_angle: FRAC_PI_2,
        segment_count,
    }
}

fn scenario_continuous_bend(context: &Context) -> Result<GeomMesh, String> {
    let section = nb150_section(context)?;
    let mesh = build_continuous_bend(&quarter_bend(1), &section, &context.config).map_err(|e| e.to_string())?;
    Ok(context.config.to_scene(&mesh))
}

fn scenario_mitered_bend(context: &Context) -> Result<GeomMesh, String> {
    let section = nb150_section(context)?;
    let mesh = build_mitered_bend(&quarter_bend(4), &section, &context.config).map_err(|e| e.to_string())?;
    Ok(context.config.to_scene(&mesh))
}

fn scenario_weld_ring(context: &Context) -> Result<GeomMesh, String> {
    let mesh = build_weld_ring(Point3::ORIGIN, Vec3::Z, 51.0, 2.0, &context.config).map_err(|e| e.to_string())?;
    Ok(context.config.to_scene(&mesh))
}

fn scenario_flange(context: &Context, kind: FlangeKind) -> Result<GeomMesh, String> {
    let section = nb150_section(context)?;
    let matched = context.catalog.resolve(150.0).map_err(|e| e.to_string())?;
    let flange = build_flange(section.outer_radius, section.inner_radius, &matched.spec, kind, &context.config)
        .map_err(|e| e.to_string())?;

    let mut mesh = flange.mesh;
    if kind == FlangeKind::Rotating {
        let ring = build_retaining_ring(section.outer_radius, &context.config).map_err(|e| e.to_string())?;
        let behind = Transform::translate(Vec3::new(0.0, 0.0, -flange.thickness));
        mesh.append(&ring.transformed(behind));
    }
    Ok(context.config.to_scene(&mesh))
}

fn scenario_branch_stub(context: &Context, main_radius: Option<f64>) -> Result<GeomMesh, String> {
    let stub = BranchStub {
        base_center: Point3::ORIGIN,
        direction: Vec3::Z,
        main_axis: Some(Vec3::X),
        saddle_axis: SaddleAxis::X,
        main_radius,
        stub: PipeCrossSection::new(50.0, 45.0).map_err(|e| e.to_string())?,
        length: 200.0,
        has_flange: true,
        flange_kind: FlangeKind::Standard,
        nominal_bore: 150.0,
    };
    let built = build_branch_stub(&stub, &context.catalog, &context.config).map_err(|e| e.to_string())?;
    Ok(context.config.to_scene(&built.combined()))
}

fn scenario_spool(context: &Context) -> Result<GeomMesh, String> {
    let section = nb150_section(context)?;
    let items = [
        SpoolItem::Flange {
            center: Point3::new(0.0, 0.0, -10.6875),
            normal: Vec3::Z,
            nominal_bore: 150.0,
            section,
            kind: FlangeKind::Standard,
        },
        SpoolItem::Straight {
            start: Point3::ORIGIN,
            end: Point3::new(0.0, 0.0, 800.0),
            section,
            cap_start: false,
            cap_end: false,
        },
        SpoolItem::ContinuousBend {
            bend: BendParameters {
                center: Point3::new(500.0, 0.0, 800.0),
                radius: 500.0,
                start_angle: std::f64::consts::PI,
                end_angle: FRAC_PI_2,
                segment_count: 1,
            },
            section,
        },
        SpoolItem::Straight {
            start: Point3::new(500.0, 0.0, 1300.0),
            end: Point3::new(1500.0, 0.0, 1300.0),
            section,
            cap_start: false,
            cap_end: true,
        },
        SpoolItem::BranchStub(BranchStub {
            base_center: Point3::new(1000.0, 0.0, 1300.0),
            direction: Vec3::Z,
            main_axis: Some(Vec3::X),
            saddle_axis: SaddleAxis::X,
            main_radius: Some(section.outer_radius),
            stub: PipeCrossSection::new(30.15, 26.65).map_err(|e| e.to_string())?,
            length: 150.0,
            has_flange: true,
            flange_kind: FlangeKind::Standard,
            nominal_bore: 50.0,
        }),
    ];
    let meshes = build_spool(&items, &context.catalog, &context.config).map_err(|e| e.to_string())?;
    Ok(merge_spool_meshes(&meshes))
}

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next().ok_or_else(|| format!("missing value for {flag}"))
    }
}
