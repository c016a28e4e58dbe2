//! The kernel pool: variables loaded from text kernels or inserted directly.
//!
//! The general getters ([`gdpool`], [`gipool`], [`gcpool`], [`gnpool`]) return
//! `None` for a variable that does not exist, matching [`FoundCode::NotFound`](crate::FoundCode).
//! The typed getters expect the variable to exist with a fixed number of
//! values, and fail with `SPICE(KERNELVARNOTFOUND)` or
//! `SPICE(BADVARIABLESIZE)` otherwise.

use maxq_spicelib::{errhnd, pool};
use maxq_std::Context;

use crate::{DimensionlessVector, Distance, MassConstant, Result, SpiceContext, forward};

/// Type of a pool variable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolType {
    Numeric,
    Character,
}

forward! {
    /// Up to `room` values of a numeric variable, starting at index `start`
    fn gdpool(name: &str, start: usize, room: usize) -> Option<Vec<f64>> => pool::gdpool;

    /// As [`gdpool`], rounding to the nearest integer
    fn gipool(name: &str, start: usize, room: usize) -> Option<Vec<i32>> => pool::gipool;

    /// Up to `room` values of a character variable, starting at index `start`
    fn gcpool(name: &str, start: usize, room: usize) -> Option<Vec<String>> => pool::gcpool;

    /// Names of variables matching `template` (`*` matches any run of
    /// characters, `%` any single character)
    fn gnpool(template: &str, start: usize, room: usize) -> Option<Vec<String>> => pool::gnpool;

    /// Insert a numeric variable, replacing any variable of that name
    fn pdpool_list(name: &str, values: &[f64]) -> () => pool::pdpool;

    fn pipool_list(name: &str, values: &[i32]) -> () => pool::pipool;

    /// Delete a variable. Deleting a variable that does not exist is not an
    /// error.
    fn dvpool(name: &str) -> () => pool::dvpool;

    /// Load a text kernel into the pool without registering it as a loaded
    /// kernel
    fn ldpool(file: &str) -> () => pool::ldpool;

    /// True if a numeric variable of this name exists
    fn expool(name: &str) -> bool => pool::expool;
}

/// Insert a single numeric value
pub fn pdpool(ctx: &mut SpiceContext, name: &str, value: f64) -> Result<()> {
    pdpool_list(ctx, name, &[value])
}

pub fn pipool(ctx: &mut SpiceContext, name: &str, value: i32) -> Result<()> {
    pipool_list(ctx, name, &[value])
}

pub fn pcpool(ctx: &mut SpiceContext, name: &str, value: &str) -> Result<()> {
    pcpool_list(ctx, name, &[value])
}

pub fn pcpool_list<S: AsRef<str>>(ctx: &mut SpiceContext, name: &str, values: &[S]) -> Result<()> {
    ctx.call(|raw| pool::pcpool(raw, name, values))
}

/// Load variables from text kernel lines, e.g.
/// `["\\begindata", "SCALE = 2.5"]`
pub fn lmpool<S: AsRef<str>>(ctx: &mut SpiceContext, lines: &[S]) -> Result<()> {
    ctx.call(|raw| pool::lmpool(raw, lines))
}

/// Delete every pool variable. Loaded kernels stay registered.
pub fn clpool(ctx: &mut SpiceContext) -> Result<()> {
    ctx.call(|raw| {
        pool::clpool(raw);
        Ok(())
    })
}

/// Number of values and type of a variable
pub fn dtpool(ctx: &mut SpiceContext, name: &str) -> Result<Option<(usize, PoolType)>> {
    let info = ctx.call(|raw| pool::dtpool(raw, name))?;
    Ok(info.map(|(n, ty)| {
        let ty = if ty == 'C' {
            PoolType::Character
        } else {
            PoolType::Numeric
        };
        (n, ty)
    }))
}

/// Exactly `N` values of a numeric variable
fn fixed_size<const N: usize>(raw: &mut Context, name: &str) -> maxq_std::Result<[f64; N]> {
    let values = pool::gdpool(raw, name, 0, N + 1)?;
    if errhnd::failed(raw) {
        return Ok([0.0; N]);
    }
    let Some(values) = values else {
        errhnd::chkin(raw, "GDPOOL")?;
        errhnd::setmsg(raw, "The numeric variable # could not be found in the kernel pool.");
        errhnd::errch(raw, "#", name.trim());
        errhnd::sigerr(raw, "SPICE(KERNELVARNOTFOUND)")?;
        errhnd::chkout(raw, "GDPOOL")?;
        return Ok([0.0; N]);
    };
    match <[f64; N]>::try_from(values.as_slice()) {
        Ok(array) => Ok(array),
        Err(_) => {
            errhnd::chkin(raw, "GDPOOL")?;
            errhnd::setmsg(raw, "The variable # has # value(s); # expected.");
            errhnd::errch(raw, "#", name.trim());
            let found = pool::lookup(raw, name).map_or(values.len(), |v| v.len());
            errhnd::errint(raw, "#", found as i64);
            errhnd::errint(raw, "#", N as i64);
            errhnd::sigerr(raw, "SPICE(BADVARIABLESIZE)")?;
            errhnd::chkout(raw, "GDPOOL")?;
            Ok([0.0; N])
        }
    }
}

/// The value of a numeric variable holding exactly one value
pub fn gdpool_scalar(ctx: &mut SpiceContext, name: &str) -> Result<f64> {
    let [value] = ctx.call(|raw| fixed_size::<1>(raw, name))?;
    Ok(value)
}

/// A single-valued variable, in km
pub fn gdpool_distance(ctx: &mut SpiceContext, name: &str) -> Result<Distance> {
    gdpool_scalar(ctx, name).map(Distance::new)
}

/// A single-valued variable, in km³/s²
pub fn gdpool_mass(ctx: &mut SpiceContext, name: &str) -> Result<MassConstant> {
    gdpool_scalar(ctx, name).map(MassConstant::new)
}

/// A variable holding exactly three values
pub fn gdpool_vector(ctx: &mut SpiceContext, name: &str) -> Result<DimensionlessVector> {
    let values = ctx.call(|raw| fixed_size::<3>(raw, name))?;
    Ok(DimensionlessVector::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FoundCode, Outcome, ResultCode};

    #[test]
    fn insert_and_fetch() {
        let mut ctx = SpiceContext::new();
        pdpool(&mut ctx, "SCALE", 2.5).unwrap();
        pdpool_list(&mut ctx, "AXES", &[1.0, 2.0, 3.0]).unwrap();
        pipool_list(&mut ctx, "IDS", &[399, 301]).unwrap();
        pcpool_list(&mut ctx, "NAMES", &["EARTH", "MOON"]).unwrap();

        assert_eq!(gdpool_scalar(&mut ctx, "SCALE").unwrap(), 2.5);
        assert_eq!(gdpool_distance(&mut ctx, "SCALE").unwrap(), Distance::new(2.5));
        assert_eq!(
            gdpool_vector(&mut ctx, "AXES").unwrap(),
            DimensionlessVector::new(1.0, 2.0, 3.0)
        );
        assert_eq!(gdpool(&mut ctx, "AXES", 1, 5).unwrap(), Some(vec![2.0, 3.0]));
        assert_eq!(gipool(&mut ctx, "IDS", 0, 2).unwrap(), Some(vec![399, 301]));
        assert_eq!(
            gcpool(&mut ctx, "NAMES", 0, 10).unwrap(),
            Some(vec!["EARTH".to_owned(), "MOON".to_owned()])
        );
        assert_eq!(dtpool(&mut ctx, "NAMES").unwrap(), Some((2, PoolType::Character)));
        assert_eq!(dtpool(&mut ctx, "AXES").unwrap(), Some((3, PoolType::Numeric)));

        let mut names = gnpool(&mut ctx, "*S", 0, 10).unwrap().unwrap();
        names.sort();
        assert_eq!(names, ["AXES", "IDS", "NAMES"]);
    }

    #[test]
    fn missing_variables() {
        let mut ctx = SpiceContext::new();

        let found = gdpool(&mut ctx, "NOT_THERE", 0, 1).unwrap();
        assert_eq!(FoundCode::from(&found), FoundCode::NotFound);

        let result = gdpool_scalar(&mut ctx, "NOT_THERE");
        assert!(matches!(&result, Err(Error::KERNELVARNOTFOUND(long)) if long.contains("NOT_THERE")));
        assert_eq!(Outcome::from(&result).code, ResultCode::Error);

        // The failure does not leak into the next call
        pdpool(&mut ctx, "THERE", 1.0).unwrap();
        assert_eq!(gdpool_scalar(&mut ctx, "THERE").unwrap(), 1.0);
    }

    #[test]
    fn wrong_sizes() {
        let mut ctx = SpiceContext::new();
        pdpool_list(&mut ctx, "PAIR", &[1.0, 2.0]).unwrap();
        assert!(matches!(gdpool_scalar(&mut ctx, "PAIR"), Err(Error::BADVARIABLESIZE(..))));
        assert!(matches!(gdpool_vector(&mut ctx, "PAIR"), Err(Error::BADVARIABLESIZE(..))));

        pcpool(&mut ctx, "TEXT", "value").unwrap();
        assert!(matches!(gdpool_scalar(&mut ctx, "TEXT"), Err(Error::KERNELVARNOTFOUND(..))));
    }

    #[test]
    fn kernel_lines() {
        let mut ctx = SpiceContext::new();
        lmpool(&mut ctx, &["\\begindata", "GM = 398600.435", "RADII = ( 6378.1 6378.1 6356.8 )"]).unwrap();
        assert_eq!(gdpool_mass(&mut ctx, "GM").unwrap(), MassConstant::new(398600.435));
        assert!(expool(&mut ctx, "RADII").unwrap());

        dvpool(&mut ctx, "GM").unwrap();
        assert!(!expool(&mut ctx, "GM").unwrap());

        clpool(&mut ctx).unwrap();
        assert_eq!(dtpool(&mut ctx, "RADII").unwrap(), None);
    }
}
