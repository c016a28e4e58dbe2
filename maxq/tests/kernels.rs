use std::fs;
use std::path::Path;

use maxq::*;
use tempfile::TempDir;

const PCK: &str = "KPL/PCK\n\
\\begindata\n\
BODY399_RADII = ( 6378.1366 6378.1366 6356.7519 )\n\
BODY399_GM = 398600.435436\n\
\\begintext\n\
Trailing comments are ignored.\n";

const LSK: &str = "KPL/LSK\n\
\\begindata\n\
DELTET/DELTA_T_A = 32.184\n\
DELTET/K = 1.657D-3\n\
DELTET/EB = 1.671D-2\n\
DELTET/M = ( 6.239996D0 1.99096871D-7 )\n\
DELTET/DELTA_AT = ( 10, @1972-JAN-1 32, @1999-JAN-1 33, @2006-JAN-1 )\n";

const META: &str = "KPL/MK\n\
\\begindata\n\
PATH_SYMBOLS = ( 'KERNELS' )\n\
PATH_VALUES = ( 'kernels' )\n\
KERNELS_TO_LOAD = ( '$KERNELS/earth.tpc', '$KERNELS/time/naif.tls' )\n";

fn content_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kernels/earth.tpc", PCK);
    write(dir.path(), "kernels/time/naif.tls", LSK);
    write(dir.path(), "mission.tm", META);
    fs::create_dir(dir.path().join("empty")).unwrap();
    dir
}

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn context(root: &TempDir) -> SpiceContext<'static> {
    SpiceContext::with_config(SpiceConfig::default().with_content_root(root.path())).unwrap()
}

#[test]
fn load_text_kernels() {
    let root = content_root();
    let mut ctx = context(&root);

    furnsh_list(&mut ctx, &["kernels/earth.tpc", "kernels/time/naif.tls"]).unwrap();
    assert_eq!(ktotal(&mut ctx, KernelType::TEXT).unwrap(), 2);
    assert_eq!(ktotal(&mut ctx, KernelType::SPK | KernelType::CK).unwrap(), 0);

    let radii = bodvrd_distance_vector(&mut ctx, "EARTH", "RADII").unwrap();
    assert_eq!(radii.z, Distance::new(6356.7519));
    assert_eq!(bodvcd_mass(&mut ctx, 399, "GM").unwrap(), MassConstant::new(398600.435436));

    let et = str2et(&mut ctx, "2000 JAN 01 12:00:00").unwrap();
    assert!(et.seconds > 64.0 && et.seconds < 64.5);

    let info = kinfo(&mut ctx, "kernels/earth.tpc").unwrap().unwrap();
    assert_eq!(info.file_type, "TEXT");
    assert_eq!(info.source, "");

    unload(&mut ctx, "kernels/earth.tpc").unwrap();
    assert!(matches!(bodvrd_distance_vector(&mut ctx, "EARTH", "RADII"), Err(Error::KERNELVARNOTFOUND(..))));
    assert_eq!(kinfo(&mut ctx, "kernels/earth.tpc").unwrap(), None);
}

#[test]
fn load_meta_kernel() {
    let root = content_root();
    let mut ctx = context(&root);

    furnsh(&mut ctx, "mission.tm").unwrap();
    assert_eq!(ktotal(&mut ctx, KernelType::all()).unwrap(), 3);
    assert_eq!(ktotal(&mut ctx, KernelType::META).unwrap(), 1);

    let first = kdata(&mut ctx, 0, KernelType::TEXT).unwrap().unwrap();
    assert_eq!(first.file, "kernels/earth.tpc");
    assert_eq!(first.source, "mission.tm");
    assert_eq!(kdata(&mut ctx, 2, KernelType::TEXT).unwrap(), None);

    unload(&mut ctx, "mission.tm").unwrap();
    assert_eq!(ktotal(&mut ctx, KernelType::all()).unwrap(), 0);
}

#[test]
fn missing_kernels() {
    let root = content_root();
    let mut ctx = context(&root);

    let err = furnsh(&mut ctx, "kernels/missing.tpc").unwrap_err();
    assert!(matches!(err, Error::NOSUCHFILE(..)));

    // Loading stops at the first missing file
    let err = furnsh_list(&mut ctx, &["kernels/earth.tpc", "nope.tls", "kernels/time/naif.tls"]);
    assert!(err.is_err());
    assert_eq!(ktotal(&mut ctx, KernelType::all()).unwrap(), 1);

    assert!(matches!(furnsh_absolute(&mut ctx, Path::new("kernels/earth.tpc")), Err(Error::NOSUCHFILE(..))));
    assert!(matches!(furnsh(&mut ctx, " "), Err(Error::BLANKFILENAME(..))));

    write(root.path(), "kernels/de.bsp", "DAF/SPK NAIF binary data follows");
    assert!(matches!(furnsh(&mut ctx, "kernels/de.bsp"), Err(Error::NOTSUPPORTED(..))));
}

#[test]
fn absolute_paths() {
    let root = content_root();
    let other = tempfile::tempdir().unwrap();
    write(other.path(), "extra.tpc", "\\begindata\nEXTRA = 7\n");

    let mut ctx = context(&root);
    furnsh_absolute(&mut ctx, &other.path().join("extra.tpc")).unwrap();
    assert_eq!(gdpool_scalar(&mut ctx, "EXTRA").unwrap(), 7.0);
}

#[test]
fn enumerate() {
    let root = content_root();
    let mut ctx = context(&root);

    assert_eq!(
        enumerate_kernels(&mut ctx, "kernels", true).unwrap(),
        ["kernels/earth.tpc", "kernels/time/naif.tls"]
    );
    assert_eq!(enumerate_kernels(&mut ctx, ".", false).unwrap().len(), 3);
    assert!(enumerate_kernels(&mut ctx, "empty", false).unwrap().is_empty());
    assert!(matches!(enumerate_kernels(&mut ctx, "empty", true), Err(Error::NOSUCHFILE(..))));
    assert!(matches!(enumerate_kernels(&mut ctx, "not_a_dir", true), Err(Error::NOSUCHFILE(..))));

    let files = enumerate_kernels(&mut ctx, "kernels", true).unwrap();
    furnsh_list(&mut ctx, &files).unwrap();
    assert_eq!(ktotal(&mut ctx, KernelType::TEXT).unwrap(), 2);
}

#[test]
fn reset_everything() {
    let root = content_root();
    let mut ctx = context(&root);
    furnsh(&mut ctx, "mission.tm").unwrap();
    boddef(&mut ctx, "LANDER", -99).unwrap();

    clear_all(&mut ctx).unwrap();
    assert_eq!(ktotal(&mut ctx, KernelType::all()).unwrap(), 0);
    assert!(!bodfnd(&mut ctx, 399, "RADII").unwrap());
    assert_eq!(bodn2c(&mut ctx, "LANDER").unwrap(), Some(-99));

    init_all(&mut ctx).unwrap();
    assert_eq!(bodn2c(&mut ctx, "LANDER").unwrap(), None);
    assert_eq!(get_erract(&mut ctx).unwrap(), ErrorAction::Return);
}
