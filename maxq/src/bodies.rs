//! Body names, NAIF ID codes and body constants (`BODY<id>_<item>` pool
//! variables).

use maxq_spicelib::{bodies, errhnd};
use maxq_std::Context;

use crate::{DimensionlessVector, Distance, DistanceVector, MassConstant, Result, SpiceContext, forward};

forward! {
    /// NAIF ID code of a body name
    fn bodn2c(name: &str) -> Option<i32> => bodies::bodn2c;

    /// Name of a body, given its ID code
    fn bodc2n(code: i32) -> Option<String> => bodies::bodc2n;

    /// As [`bodn2c`], also accepting a code written as an integer string
    fn bods2c(name: &str) -> Option<i32> => bodies::bods2c;

    /// Define a name/code pair, overriding built-in and kernel definitions
    fn boddef(name: &str, code: i32) -> () => bodies::boddef;

    /// True if the pool holds the constant `item` for `body`
    fn bodfnd(body: i32, item: &str) -> bool => bodies::bodfnd;
}

/// Values of a body constant that must hold exactly `N` values
fn body_values<const N: usize>(
    raw: &mut Context,
    values: Option<Vec<f64>>,
    label: &str,
) -> maxq_std::Result<[f64; N]> {
    let Some(values) = values else {
        return Ok([0.0; N]);
    };
    match <[f64; N]>::try_from(values.as_slice()) {
        Ok(array) => Ok(array),
        Err(_) => {
            errhnd::chkin(raw, "BODVAR")?;
            errhnd::setmsg(raw, "The body constant # has # value(s); # expected.");
            errhnd::errch(raw, "#", label);
            errhnd::errint(raw, "#", values.len() as i64);
            errhnd::errint(raw, "#", N as i64);
            errhnd::sigerr(raw, "SPICE(BADVARIABLESIZE)")?;
            errhnd::chkout(raw, "BODVAR")?;
            Ok([0.0; N])
        }
    }
}

// Fetched without a size limit so any length other than N is a size mismatch
fn bodvcd_fixed<const N: usize>(ctx: &mut SpiceContext, body: i32, item: &str) -> Result<[f64; N]> {
    ctx.call(|raw| {
        let values = bodies::bodvcd(raw, body, item, usize::MAX)?;
        body_values(raw, values, &format!("{item} of body {body}"))
    })
}

fn bodvrd_fixed<const N: usize>(ctx: &mut SpiceContext, body: &str, item: &str) -> Result<[f64; N]> {
    ctx.call(|raw| {
        let values = bodies::bodvrd(raw, body, item, usize::MAX)?;
        body_values(raw, values, &format!("{item} of {}", body.trim()))
    })
}

/// All values of a body constant, at most `maxn`
pub fn bodvcd(ctx: &mut SpiceContext, body: i32, item: &str, maxn: usize) -> Result<Vec<f64>> {
    Ok(ctx
        .call(|raw| bodies::bodvcd(raw, body, item, maxn))?
        .unwrap_or_default())
}

pub fn bodvrd(ctx: &mut SpiceContext, body: &str, item: &str, maxn: usize) -> Result<Vec<f64>> {
    Ok(ctx
        .call(|raw| bodies::bodvrd(raw, body, item, maxn))?
        .unwrap_or_default())
}

pub fn bodvcd_scalar(ctx: &mut SpiceContext, body: i32, item: &str) -> Result<f64> {
    let [value] = bodvcd_fixed::<1>(ctx, body, item)?;
    Ok(value)
}

pub fn bodvcd_vector(ctx: &mut SpiceContext, body: i32, item: &str) -> Result<DimensionlessVector> {
    bodvcd_fixed::<3>(ctx, body, item).map(DimensionlessVector::from_array)
}

/// A body's `GM`, or another single-valued mass constant
pub fn bodvcd_mass(ctx: &mut SpiceContext, body: i32, item: &str) -> Result<MassConstant> {
    let [gm] = bodvcd_fixed::<1>(ctx, body, item)?;
    Ok(MassConstant::new(gm))
}

/// A three-valued constant in km, such as `RADII`
pub fn bodvcd_distance_vector(ctx: &mut SpiceContext, body: i32, item: &str) -> Result<DistanceVector> {
    bodvcd_fixed::<3>(ctx, body, item).map(DistanceVector::from_array)
}

pub fn bodvrd_scalar(ctx: &mut SpiceContext, body: &str, item: &str) -> Result<f64> {
    let [value] = bodvrd_fixed::<1>(ctx, body, item)?;
    Ok(value)
}

pub fn bodvrd_vector(ctx: &mut SpiceContext, body: &str, item: &str) -> Result<DimensionlessVector> {
    bodvrd_fixed::<3>(ctx, body, item).map(DimensionlessVector::from_array)
}

pub fn bodvrd_mass(ctx: &mut SpiceContext, body: &str, item: &str) -> Result<MassConstant> {
    let [gm] = bodvrd_fixed::<1>(ctx, body, item)?;
    Ok(MassConstant::new(gm))
}

pub fn bodvrd_distance_vector(ctx: &mut SpiceContext, body: &str, item: &str) -> Result<DistanceVector> {
    bodvrd_fixed::<3>(ctx, body, item).map(DistanceVector::from_array)
}

/// A body's mean radius: the mean of its three `RADII`
pub fn bodvrd_mean_radius(ctx: &mut SpiceContext, body: &str) -> Result<Distance> {
    let radii = bodvrd_fixed::<3>(ctx, body, "RADII")?;
    Ok(Distance::new(radii.iter().sum::<f64>() / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, pdpool, pdpool_list};

    #[test]
    fn names_and_codes() {
        let mut ctx = SpiceContext::new();
        assert_eq!(bodn2c(&mut ctx, "earth").unwrap(), Some(399));
        assert_eq!(bodc2n(&mut ctx, 301).unwrap().as_deref(), Some("MOON"));
        assert_eq!(bods2c(&mut ctx, "-77").unwrap(), Some(-77));
        assert_eq!(bodn2c(&mut ctx, "NOT A BODY").unwrap(), None);

        boddef(&mut ctx, "MY_LANDER", -1234).unwrap();
        assert_eq!(bodn2c(&mut ctx, "my_lander").unwrap(), Some(-1234));
        assert!(matches!(boddef(&mut ctx, " ", 1), Err(Error::BLANKNAMEASSIGNED(..))));
    }

    #[test]
    fn constants() {
        let mut ctx = SpiceContext::new();
        pdpool_list(&mut ctx, "BODY399_RADII", &[6378.1366, 6378.1366, 6356.7519]).unwrap();
        pdpool(&mut ctx, "BODY399_GM", 398600.435436).unwrap();

        assert!(bodfnd(&mut ctx, 399, "RADII").unwrap());
        assert_eq!(
            bodvrd_distance_vector(&mut ctx, "EARTH", "RADII").unwrap(),
            DistanceVector::from_array([6378.1366, 6378.1366, 6356.7519])
        );
        assert_eq!(bodvcd_mass(&mut ctx, 399, "GM").unwrap(), MassConstant::new(398600.435436));
        assert_eq!(bodvrd_scalar(&mut ctx, "EARTH", "GM").unwrap(), 398600.435436);
        assert_eq!(bodvcd(&mut ctx, 399, "RADII", 3).unwrap().len(), 3);

        assert!(matches!(bodvrd_scalar(&mut ctx, "EARTH", "RADII"), Err(Error::BADVARIABLESIZE(..))));
        assert!(matches!(bodvcd(&mut ctx, 399, "RADII", 2), Err(Error::ARRAYTOOSMALL(..))));
        assert!(matches!(bodvcd_scalar(&mut ctx, 399, "RADII"), Err(Error::BADVARIABLESIZE(..))));
        pdpool_list(&mut ctx, "BODY399_POLE_RA", &[0.0, -0.641, 0.0, 1.0, 2.0]).unwrap();
        assert!(matches!(bodvcd_vector(&mut ctx, 399, "POLE_RA"), Err(Error::BADVARIABLESIZE(..))));
        assert!(matches!(bodvrd_scalar(&mut ctx, "EARTH", "POLE_RA"), Err(Error::BADVARIABLESIZE(..))));
        assert!(matches!(bodvrd_mass(&mut ctx, "MARS", "GM"), Err(Error::KERNELVARNOTFOUND(..))));
        assert!(matches!(bodvrd_vector(&mut ctx, "VULCAN", "RADII"), Err(Error::NOTRANSLATION(..))));

        // Errors above must not affect this call
        assert_eq!(bodvcd_vector(&mut ctx, 399, "RADII").unwrap().z, 6356.7519);
    }
}
