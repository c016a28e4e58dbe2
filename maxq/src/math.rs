//! Vector, matrix and rotation math over the unit-tagged types, plus unit
//! conversion and a few numeric routines.
//!
//! Pure functions take no context. Functions that can fail on bad input
//! (singular matrices, invalid axes, ...) take a [`SpiceContext`] and return
//! [`Result`].

use maxq_spicelib::{consts, matrices, numeric, rotations, states, units, vectors};

use crate::{
    Angle, AngularVelocity, Axis, DimensionlessVector, Distance, DistanceVector, EulerAngles,
    EulerState, Quaternion, Result, RotationMatrix, Speed, SpiceContext, StateTransform, Units,
    VelocityVector,
};

/// Conversion to and from the toolkit's plain arrays
trait Components: Copy {
    fn components(self) -> [f64; 3];
    fn from_components(a: [f64; 3]) -> Self;
}

macro_rules! components {
    ($($t:ty),*) => {$(
        impl Components for $t {
            fn components(self) -> [f64; 3] {
                self.to_array()
            }
            fn from_components(a: [f64; 3]) -> Self {
                Self::from_array(a)
            }
        }
    )*};
}

components!(DimensionlessVector, DistanceVector, VelocityVector);

fn map2<V: Components>(a: V, b: V, f: fn(&[f64; 3], &[f64; 3]) -> [f64; 3]) -> V {
    V::from_components(f(&a.components(), &b.components()))
}

pub fn pi() -> f64 {
    consts::pi()
}

pub fn halfpi() -> f64 {
    consts::halfpi()
}

pub fn twopi() -> f64 {
    consts::twopi()
}

/// Degrees per radian
pub fn dpr() -> f64 {
    consts::dpr()
}

/// Radians per degree
pub fn rpd() -> f64 {
    consts::rpd()
}

/// Speed of light in vacuum
pub fn clight() -> Speed {
    Speed::new(consts::clight())
}

pub fn dpmax() -> f64 {
    consts::dpmax()
}

pub fn dpmin() -> f64 {
    consts::dpmin()
}

pub fn intmax() -> i32 {
    consts::intmax()
}

pub fn intmin() -> i32 {
    consts::intmin()
}

pub fn vadd(v1: DimensionlessVector, v2: DimensionlessVector) -> DimensionlessVector {
    map2(v1, v2, vectors::vadd)
}

pub fn vadd_distance(v1: DistanceVector, v2: DistanceVector) -> DistanceVector {
    map2(v1, v2, vectors::vadd)
}

pub fn vadd_velocity(v1: VelocityVector, v2: VelocityVector) -> VelocityVector {
    map2(v1, v2, vectors::vadd)
}

pub fn vsub(v1: DimensionlessVector, v2: DimensionlessVector) -> DimensionlessVector {
    map2(v1, v2, vectors::vsub)
}

pub fn vsub_distance(v1: DistanceVector, v2: DistanceVector) -> DistanceVector {
    map2(v1, v2, vectors::vsub)
}

pub fn vsub_velocity(v1: VelocityVector, v2: VelocityVector) -> VelocityVector {
    map2(v1, v2, vectors::vsub)
}

pub fn vscl(s: f64, v: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vscl(s, &v.to_array()))
}

pub fn vscl_distance(s: f64, v: DistanceVector) -> DistanceVector {
    DistanceVector::from_array(vectors::vscl(s, &v.to_array()))
}

pub fn vscl_velocity(s: f64, v: VelocityVector) -> VelocityVector {
    VelocityVector::from_array(vectors::vscl(s, &v.to_array()))
}

/// Negated vector
pub fn vminus(v: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vminus(&v.to_array()))
}

pub fn vminus_distance(v: DistanceVector) -> DistanceVector {
    DistanceVector::from_array(vectors::vminus(&v.to_array()))
}

pub fn vdot(v1: DimensionlessVector, v2: DimensionlessVector) -> f64 {
    vectors::vdot(&v1.to_array(), &v2.to_array())
}

pub fn vcrss(v1: DimensionlessVector, v2: DimensionlessVector) -> DimensionlessVector {
    map2(v1, v2, vectors::vcrss)
}

/// Unit vector along `v1 × v2`; zero if the vectors are parallel
pub fn ucrss(v1: DimensionlessVector, v2: DimensionlessVector) -> DimensionlessVector {
    map2(v1, v2, vectors::ucrss)
}

pub fn vnorm(v: DimensionlessVector) -> f64 {
    vectors::vnorm(&v.to_array())
}

pub fn vnorm_distance(v: DistanceVector) -> Distance {
    Distance::new(vectors::vnorm(&v.to_array()))
}

pub fn vnorm_velocity(v: VelocityVector) -> Speed {
    Speed::new(vectors::vnorm(&v.to_array()))
}

/// Unit vector along `v`. The zero vector is returned unchanged.
pub fn vhat(v: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vhat(&v.to_array()))
}

pub fn vhat_distance(v: DistanceVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vhat(&v.to_array()))
}

pub fn vhat_velocity(v: VelocityVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vhat(&v.to_array()))
}

/// Unit vector and magnitude
pub fn unorm_distance(v: DistanceVector) -> (DimensionlessVector, Distance) {
    let (u, n) = vectors::unorm(&v.to_array());
    (DimensionlessVector::from_array(u), Distance::new(n))
}

pub fn unorm_velocity(v: VelocityVector) -> (DimensionlessVector, Speed) {
    let (u, n) = vectors::unorm(&v.to_array());
    (DimensionlessVector::from_array(u), Speed::new(n))
}

pub fn vzero(v: DimensionlessVector) -> bool {
    vectors::vzero(&v.to_array())
}

pub fn vdist(v1: DistanceVector, v2: DistanceVector) -> Distance {
    Distance::new(vectors::vdist(&v1.to_array(), &v2.to_array()))
}

/// Angle between two vectors, in `[0, π]`; zero if either is the zero vector
pub fn vsep(v1: DimensionlessVector, v2: DimensionlessVector) -> Angle {
    Angle::new(vectors::vsep(&v1.to_array(), &v2.to_array()))
}

pub fn vsep_distance(v1: DistanceVector, v2: DistanceVector) -> Angle {
    Angle::new(vectors::vsep(&v1.to_array(), &v2.to_array()))
}

/// Relative difference `|v1 - v2| / max(|v1|, |v2|)`
pub fn vrel(v1: DistanceVector, v2: DistanceVector) -> f64 {
    vectors::vrel(&v1.to_array(), &v2.to_array())
}

/// `a v1 + b v2`
pub fn vlcom(a: f64, v1: DimensionlessVector, b: f64, v2: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vlcom(a, &v1.to_array(), b, &v2.to_array()))
}

pub fn vlcom_distance(a: f64, v1: DistanceVector, b: f64, v2: DistanceVector) -> DistanceVector {
    DistanceVector::from_array(vectors::vlcom(a, &v1.to_array(), b, &v2.to_array()))
}

/// `a v1 + b v2 + c v3`
pub fn vlcom3(
    a: f64,
    v1: DimensionlessVector,
    b: f64,
    v2: DimensionlessVector,
    c: f64,
    v3: DimensionlessVector,
) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vlcom3(
        a,
        &v1.to_array(),
        b,
        &v2.to_array(),
        c,
        &v3.to_array(),
    ))
}

/// Projection of `a` onto `b`
pub fn vproj(a: DimensionlessVector, b: DimensionlessVector) -> DimensionlessVector {
    map2(a, b, vectors::vproj)
}

pub fn vproj_distance(a: DistanceVector, b: DistanceVector) -> DistanceVector {
    map2(a, b, vectors::vproj)
}

/// Component of `a` perpendicular to `b`
pub fn vperp(a: DimensionlessVector, b: DimensionlessVector) -> DimensionlessVector {
    map2(a, b, vectors::vperp)
}

pub fn vperp_distance(a: DistanceVector, b: DistanceVector) -> DistanceVector {
    map2(a, b, vectors::vperp)
}

/// Rotate `v` about `axis` by `theta` (right-handed)
pub fn vrotv(v: DimensionlessVector, axis: DimensionlessVector, theta: Angle) -> DimensionlessVector {
    DimensionlessVector::from_array(vectors::vrotv(&v.to_array(), &axis.to_array(), theta.radians))
}

pub fn vrotv_distance(v: DistanceVector, axis: DimensionlessVector, theta: Angle) -> DistanceVector {
    DistanceVector::from_array(vectors::vrotv(&v.to_array(), &axis.to_array(), theta.radians))
}

/// `v1ᵀ M v2`
pub fn vtmv(v1: DimensionlessVector, m: &RotationMatrix, v2: DimensionlessVector) -> f64 {
    vectors::vtmv(&v1.to_array(), &m.m, &v2.to_array())
}

pub fn ident() -> RotationMatrix {
    RotationMatrix::identity()
}

pub fn xpose(m: &RotationMatrix) -> RotationMatrix {
    RotationMatrix::new(matrices::xpose(&m.m))
}

pub fn mxm(m1: &RotationMatrix, m2: &RotationMatrix) -> RotationMatrix {
    RotationMatrix::new(matrices::mxm(&m1.m, &m2.m))
}

/// `m1 m2ᵀ`
pub fn mxmt(m1: &RotationMatrix, m2: &RotationMatrix) -> RotationMatrix {
    RotationMatrix::new(matrices::mxmt(&m1.m, &m2.m))
}

/// `m1ᵀ m2`
pub fn mtxm(m1: &RotationMatrix, m2: &RotationMatrix) -> RotationMatrix {
    RotationMatrix::new(matrices::mtxm(&m1.m, &m2.m))
}

pub fn mxv(m: &RotationMatrix, v: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(matrices::mxv(&m.m, &v.to_array()))
}

pub fn mxv_distance(m: &RotationMatrix, v: DistanceVector) -> DistanceVector {
    DistanceVector::from_array(matrices::mxv(&m.m, &v.to_array()))
}

pub fn mxv_velocity(m: &RotationMatrix, v: VelocityVector) -> VelocityVector {
    VelocityVector::from_array(matrices::mxv(&m.m, &v.to_array()))
}

/// `mᵀ v`
pub fn mtxv(m: &RotationMatrix, v: DimensionlessVector) -> DimensionlessVector {
    DimensionlessVector::from_array(matrices::mtxv(&m.m, &v.to_array()))
}

pub fn mtxv_distance(m: &RotationMatrix, v: DistanceVector) -> DistanceVector {
    DistanceVector::from_array(matrices::mtxv(&m.m, &v.to_array()))
}

pub fn det(m: &RotationMatrix) -> f64 {
    matrices::det(&m.m)
}

pub fn trace(m: &RotationMatrix) -> f64 {
    matrices::trace(&m.m)
}

/// General 3x3 inverse; a singular matrix gives the zero matrix
pub fn invert(m: &RotationMatrix) -> RotationMatrix {
    RotationMatrix::new(matrices::invert(&m.m))
}

/// Inverse of a matrix with orthogonal columns
pub fn invort(ctx: &mut SpiceContext, m: &RotationMatrix) -> Result<RotationMatrix> {
    ctx.call(|raw| matrices::invort(raw, &m.m)).map(RotationMatrix::new)
}

/// True if `m` is a rotation, to within `ntol` in column norms and `dtol` in
/// the determinant
pub fn isrot(m: &RotationMatrix, ntol: f64, dtol: f64) -> bool {
    matrices::isrot(&m.m, ntol, dtol)
}

/// Matrix that rotates the coordinate frame by `angle` about `axis`
pub fn rotate(angle: Angle, axis: Axis) -> RotationMatrix {
    RotationMatrix::new(rotations::rotate(angle.radians, axis.number()))
}

/// `rotate(angle, axis) * m`
pub fn rotmat(m: &RotationMatrix, angle: Angle, axis: Axis) -> RotationMatrix {
    RotationMatrix::new(rotations::rotmat(&m.m, angle.radians, axis.number()))
}

/// `v` expressed in the frame rotated by `angle` about `axis`
pub fn rotvec(v: DimensionlessVector, angle: Angle, axis: Axis) -> DimensionlessVector {
    DimensionlessVector::from_array(rotations::rotvec(&v.to_array(), angle.radians, axis.number()))
}

/// Matrix that rotates vectors by `angle` about `axis`
pub fn axisar(axis: DimensionlessVector, angle: Angle) -> RotationMatrix {
    RotationMatrix::new(rotations::axisar(&axis.to_array(), angle.radians))
}

/// Axis and angle of a rotation matrix
pub fn raxisa(ctx: &mut SpiceContext, m: &RotationMatrix) -> Result<(DimensionlessVector, Angle)> {
    let (axis, angle) = ctx.call(|raw| rotations::raxisa(raw, &m.m))?;
    Ok((DimensionlessVector::from_array(axis), Angle::new(angle)))
}

pub fn q2m(q: Quaternion) -> RotationMatrix {
    RotationMatrix::new(rotations::q2m(&q.to_array()))
}

/// Unit quaternion of a rotation matrix, with a non-negative scalar part
pub fn m2q(ctx: &mut SpiceContext, m: &RotationMatrix) -> Result<Quaternion> {
    ctx.call(|raw| rotations::m2q(raw, &m.m)).map(Quaternion::from_array)
}

pub fn qxq(q1: Quaternion, q2: Quaternion) -> Quaternion {
    q1 * q2
}

/// Rotation matrix from Euler angles: `[angle3]axis3 [angle2]axis2 [angle1]axis1`
pub fn eul2m(
    ctx: &mut SpiceContext,
    angles: EulerAngles,
    axis3: Axis,
    axis2: Axis,
    axis1: Axis,
) -> Result<RotationMatrix> {
    ctx.call(|raw| {
        rotations::eul2m(
            raw,
            angles.angle3.radians,
            angles.angle2.radians,
            angles.angle1.radians,
            axis3.number(),
            axis2.number(),
            axis1.number(),
        )
    })
    .map(RotationMatrix::new)
}

/// Euler angles of a rotation matrix. The middle axis must differ from the
/// outer two.
pub fn m2eul(
    ctx: &mut SpiceContext,
    m: &RotationMatrix,
    axis3: Axis,
    axis2: Axis,
    axis1: Axis,
) -> Result<EulerAngles> {
    let (a3, a2, a1) = ctx.call(|raw| {
        rotations::m2eul(raw, &m.m, axis3.number(), axis2.number(), axis1.number())
    })?;
    Ok(EulerAngles::new(Angle::new(a3), Angle::new(a2), Angle::new(a1)))
}

/// Frame whose axis `indexa` points along `axdef`, with `plndef` in the plane
/// of axes `indexa` and `indexp`
pub fn twovec(
    ctx: &mut SpiceContext,
    axdef: DimensionlessVector,
    indexa: Axis,
    plndef: DimensionlessVector,
    indexp: Axis,
) -> Result<RotationMatrix> {
    ctx.call(|raw| {
        rotations::twovec(
            raw,
            &axdef.to_array(),
            indexa.number(),
            &plndef.to_array(),
            indexp.number(),
        )
    })
    .map(RotationMatrix::new)
}

/// State transformation from a rotation and the angular velocity of the
/// target frame relative to the source, expressed in the source frame
pub fn rav2xf(rot: &RotationMatrix, av: AngularVelocity) -> StateTransform {
    StateTransform::new(states::rav2xf(&rot.m, &av.to_array()))
}

pub fn xf2rav(xform: &StateTransform) -> (RotationMatrix, AngularVelocity) {
    let (rot, av) = states::xf2rav(&xform.m);
    (RotationMatrix::new(rot), AngularVelocity::from_array(av))
}

/// Inverse of a state transformation, without a general 6x6 inversion
pub fn invstm(xform: &StateTransform) -> StateTransform {
    StateTransform::new(states::invstm(&xform.m))
}

/// State transformation from Euler angles and their rates, with the axes
/// as for [`eul2m`]
pub fn eul2xf(
    ctx: &mut SpiceContext,
    euler: EulerState,
    axis3: Axis,
    axis2: Axis,
    axis1: Axis,
) -> Result<StateTransform> {
    ctx.call(|raw| states::eul2xf(raw, &euler.to_array(), axis3.number(), axis2.number(), axis1.number()))
        .map(StateTransform::new)
}

/// Euler angles and rates of a state transformation. The flag is false when
/// the angles are degenerate; angle 1 and its rate are then zero.
pub fn xf2eul(
    ctx: &mut SpiceContext,
    xform: &StateTransform,
    axis3: Axis,
    axis2: Axis,
    axis1: Axis,
) -> Result<(EulerState, bool)> {
    let (eulang, unique) =
        ctx.call(|raw| states::xf2eul(raw, &xform.m, axis3.number(), axis2.number(), axis1.number()))?;
    Ok((EulerState::from_array(eulang), unique))
}

/// Convert `x` between units of the same dimension
pub fn convrt(ctx: &mut SpiceContext, x: f64, input: Units, output: Units) -> Result<f64> {
    ctx.call(|raw| units::convrt(raw, x, input.name(), output.name()))
}

/// Value and derivative at `x` of the Lagrange polynomial through the points
pub fn lgrind(ctx: &mut SpiceContext, xvals: &[f64], yvals: &[f64], x: f64) -> Result<(f64, f64)> {
    ctx.call(|raw| numeric::lgrind(raw, xvals, yvals, x))
}

/// Value and derivative at `x` of the Hermite polynomial matching the values
/// and derivatives in `yvals`, interleaved as `[f(x0), f'(x0), f(x1), ...]`
pub fn hrmint(ctx: &mut SpiceContext, xvals: &[f64], yvals: &[f64], x: f64) -> Result<(f64, f64)> {
    ctx.call(|raw| numeric::hrmint(raw, xvals, yvals, x))
}

/// Roots of `a x² + b x + c`, each as `[real, imaginary]`
pub fn rquad(ctx: &mut SpiceContext, a: f64, b: f64, c: f64) -> Result<([f64; 2], [f64; 2])> {
    ctx.call(|raw| numeric::rquad(raw, a, b, c))
}

pub fn bsrchd(value: f64, array: &[f64]) -> Option<usize> {
    numeric::bsrchd(value, array)
}

pub fn shelld(array: &mut [f64]) {
    numeric::shelld(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, StateVector};
    use approx::assert_abs_diff_eq;

    fn assert_vec_eq(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn typed_vectors() {
        let r1 = DistanceVector::from_array([3.0, 0.0, 4.0]);
        let r2 = DistanceVector::from_array([1.0, 1.0, 1.0]);
        assert_eq!(vnorm_distance(r1), Distance::new(5.0));
        assert_eq!(vadd_distance(r1, r2).to_array(), [4.0, 1.0, 5.0]);
        assert_eq!(vsub_distance(r1, r2), r1 - r2);
        assert_eq!(vdist(r1, r1), Distance::ZERO);
        assert_vec_eq(vhat_distance(r1).to_array(), [0.6, 0.0, 0.8]);

        let v = VelocityVector::from_array([0.0, -2.0, 0.0]);
        assert_eq!(vnorm_velocity(v), Speed::new(2.0));
        let (dir, speed) = unorm_velocity(v);
        assert_eq!((dir, speed), (DimensionlessVector::new(0.0, -1.0, 0.0), Speed::new(2.0)));

        let x = DimensionlessVector::X_AXIS;
        let y = DimensionlessVector::Y_AXIS;
        assert_eq!(vcrss(x, y), DimensionlessVector::Z_AXIS);
        assert_abs_diff_eq!(vsep(x, y).degrees(), 90.0, epsilon = 1e-12);
        assert_vec_eq(
            vrotv(x, DimensionlessVector::Z_AXIS, Angle::from_degrees(90.0)).to_array(),
            y.to_array(),
        );
        assert!(vzero(DimensionlessVector::default()));
    }

    #[test]
    fn typed_rotations() {
        let mut ctx = SpiceContext::new();
        let m = rotate(Angle::from_degrees(30.0), Axis::Z);
        assert!(isrot(&m, 1e-12, 1e-12));
        let product = mxm(&m, &xpose(&m));
        for i in 0..3 {
            assert_vec_eq(product.m[i], ident().m[i]);
        }

        let q = m2q(&mut ctx, &m).unwrap();
        assert!(q.w >= 0.0);
        let back = q2m(q);
        for i in 0..3 {
            assert_vec_eq(back.m[i], m.m[i]);
        }

        let (axis, angle) = raxisa(&mut ctx, &m).unwrap();
        assert_abs_diff_eq!(angle.degrees(), 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(axis.z.abs(), 1.0, epsilon = 1e-12);

        let angles = EulerAngles::new(
            Angle::from_degrees(10.0),
            Angle::from_degrees(20.0),
            Angle::from_degrees(30.0),
        );
        let r = eul2m(&mut ctx, angles, Axis::Z, Axis::X, Axis::Z).unwrap();
        let out = m2eul(&mut ctx, &r, Axis::Z, Axis::X, Axis::Z).unwrap();
        assert_abs_diff_eq!(out.angle3.radians, angles.angle3.radians, epsilon = 1e-12);
        assert_abs_diff_eq!(out.angle2.radians, angles.angle2.radians, epsilon = 1e-12);
        assert_abs_diff_eq!(out.angle1.radians, angles.angle1.radians, epsilon = 1e-12);

        assert!(matches!(
            m2eul(&mut ctx, &r, Axis::Z, Axis::Z, Axis::X),
            Err(Error::BADAXISNUMBERS(..))
        ));
        assert!(matches!(m2q(&mut ctx, &RotationMatrix::default()), Err(Error::NOTAROTATION(..))));
        assert!(matches!(
            twovec(&mut ctx, DimensionlessVector::X_AXIS, Axis::X, DimensionlessVector::X_AXIS, Axis::Y),
            Err(Error::DEPENDENTVECTORS(..))
        ));

        let frame = twovec(&mut ctx, DimensionlessVector::Y_AXIS, Axis::X, DimensionlessVector::Z_AXIS, Axis::Y)
            .unwrap();
        assert_vec_eq(mxv(&frame, DimensionlessVector::Y_AXIS).to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn conversions_and_numerics() {
        let mut ctx = SpiceContext::new();
        assert_eq!(convrt(&mut ctx, 2.0, Units::Kilometers, Units::Meters).unwrap(), 2000.0);
        assert!(matches!(
            convrt(&mut ctx, 1.0, Units::Kilometers, Units::Seconds),
            Err(Error::INCOMPATIBLEUNITS(..))
        ));
        assert_abs_diff_eq!(convrt(&mut ctx, 1.0, Units::Au, Units::Kilometers).unwrap(), 149597870.7, epsilon = 1e-6);

        let (p, dp) = lgrind(&mut ctx, &[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], 3.0).unwrap();
        assert_abs_diff_eq!(p, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dp, 6.0, epsilon = 1e-12);
        assert_eq!(rquad(&mut ctx, 1.0, 0.0, -4.0).unwrap(), ([2.0, 0.0], [-2.0, 0.0]));
        assert!(matches!(rquad(&mut ctx, 0.0, 0.0, 1.0), Err(Error::DEGENERATECASE(..))));

        let (p, dp) = hrmint(&mut ctx, &[0.0, 1.0], &[0.0, 0.0, 1.0, 3.0], 2.0).unwrap();
        assert_abs_diff_eq!(p, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dp, 12.0, epsilon = 1e-12);
        assert!(matches!(hrmint(&mut ctx, &[0.0, 1.0], &[0.0; 3], 2.0), Err(Error::SIZEMISMATCH(..))));

        let mut xs = [3.0, 1.0, 2.0];
        shelld(&mut xs);
        assert_eq!(bsrchd(3.0, &xs), Some(2));
        assert_eq!(clight().kmps, 299792.458);
    }

    #[test]
    fn state_transforms() {
        let mut ctx = SpiceContext::new();
        let rot = rotate(Angle::from_degrees(40.0), Axis::Z);
        let av = AngularVelocity::from_array([0.0, 0.0, 1e-3]);
        let xform = rav2xf(&rot, av);
        let (rot2, av2) = xf2rav(&xform);
        for i in 0..3 {
            assert_vec_eq(rot2.m[i], rot.m[i]);
        }
        assert_vec_eq(av2.to_array(), av.to_array());

        let s = StateVector::from_array([7000.0, 0.0, 0.0, 0.0, 7.5, 0.0]);
        let back = invstm(&xform) * (xform * s);
        for (x, y) in back.to_array().iter().zip(s.to_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-9);
        }

        let euler = EulerState::from_array([0.3, 0.2, 0.1, 1e-3, -2e-3, 5e-4]);
        let xform = eul2xf(&mut ctx, euler, Axis::Z, Axis::X, Axis::Z).unwrap();
        let (out, unique) = xf2eul(&mut ctx, &xform, Axis::Z, Axis::X, Axis::Z).unwrap();
        assert!(unique);
        for (x, y) in out.to_array().iter().zip(euler.to_array()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-12);
        }
        assert!(matches!(
            eul2xf(&mut ctx, euler, Axis::Z, Axis::Z, Axis::X),
            Err(Error::BADAXISNUMBERS(..))
        ));
    }
}
