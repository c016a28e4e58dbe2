//! Unit-tagged payloads and the enumerations used by the API.
//!
//! Scalars carry their unit in the field name (`Distance { km }`,
//! `Speed { kmps }`), so a value can't silently be used in the wrong unit.
//! Every type's `Default` is zero, including [`RotationMatrix`] and
//! [`Quaternion`]; use their `identity()` constructors for the identity.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use bitflags::bitflags;

macro_rules! scalar {
    ($(#[$meta:meta])* $name:ident { $field:ident }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
        pub struct $name {
            pub $field: f64,
        }

        impl $name {
            pub const ZERO: Self = Self { $field: 0.0 };

            pub const fn new($field: f64) -> Self {
                Self { $field }
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self::new(self.$field + rhs.$field)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self::new(self.$field - rhs.$field)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.$field += rhs.$field;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.$field -= rhs.$field;
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self::new(-self.$field)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self::new(self.$field * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::new(self * rhs.$field)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self::new(self.$field / rhs)
            }
        }

        /// Ratio of two quantities of the same unit
        impl Div for $name {
            type Output = f64;
            fn div(self, rhs: Self) -> f64 {
                self.$field / rhs.$field
            }
        }
    };
}

scalar!(
    /// Angle in radians
    Angle { radians }
);
scalar!(
    /// Angular rate in radians per second
    AngularRate { radians_per_second }
);
scalar!(
    /// Distance in kilometres
    Distance { km }
);
scalar!(
    /// Speed in kilometres per second
    Speed { kmps }
);
scalar!(
    /// Duration in seconds
    EphemerisPeriod { seconds }
);
scalar!(
    /// Gravitational parameter GM, in km³/s²
    MassConstant { gm }
);

impl Angle {
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    pub fn degrees(self) -> f64 {
        self.radians.to_degrees()
    }
}

impl Distance {
    pub fn from_m(m: f64) -> Self {
        Self::new(m / 1000.0)
    }

    pub fn m(self) -> f64 {
        self.km * 1000.0
    }
}

impl Speed {
    pub fn from_mps(mps: f64) -> Self {
        Self::new(mps / 1000.0)
    }
}

impl EphemerisPeriod {
    pub fn from_days(days: f64) -> Self {
        Self::new(days * maxq_spicelib::time::spd())
    }

    pub fn days(self) -> f64 {
        self.seconds / maxq_spicelib::time::spd()
    }
}

impl Div<EphemerisPeriod> for Distance {
    type Output = Speed;
    fn div(self, rhs: EphemerisPeriod) -> Speed {
        Speed::new(self.km / rhs.seconds)
    }
}

impl Mul<EphemerisPeriod> for Speed {
    type Output = Distance;
    fn mul(self, rhs: EphemerisPeriod) -> Distance {
        Distance::new(self.kmps * rhs.seconds)
    }
}

impl Div<EphemerisPeriod> for Angle {
    type Output = AngularRate;
    fn div(self, rhs: EphemerisPeriod) -> AngularRate {
        AngularRate::new(self.radians / rhs.seconds)
    }
}

impl Mul<EphemerisPeriod> for AngularRate {
    type Output = Angle;
    fn mul(self, rhs: EphemerisPeriod) -> Angle {
        Angle::new(self.radians_per_second * rhs.seconds)
    }
}

/// Ephemeris time (TDB), in seconds past J2000
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct EphemerisTime {
    pub seconds: f64,
}

impl EphemerisTime {
    pub const J2000: Self = Self { seconds: 0.0 };

    pub const fn new(seconds: f64) -> Self {
        Self { seconds }
    }
}

impl Add<EphemerisPeriod> for EphemerisTime {
    type Output = Self;
    fn add(self, rhs: EphemerisPeriod) -> Self {
        Self::new(self.seconds + rhs.seconds)
    }
}

impl Sub<EphemerisPeriod> for EphemerisTime {
    type Output = Self;
    fn sub(self, rhs: EphemerisPeriod) -> Self {
        Self::new(self.seconds - rhs.seconds)
    }
}

impl Sub for EphemerisTime {
    type Output = EphemerisPeriod;
    fn sub(self, rhs: Self) -> EphemerisPeriod {
        EphemerisPeriod::new(self.seconds - rhs.seconds)
    }
}

macro_rules! vector {
    ($(#[$meta:meta])* $name:ident ($scalar:ty, $unit:ident) { $($field:ident),* }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $scalar,)*
        }

        impl $name {
            pub fn new($($field: $scalar),*) -> Self {
                Self { $($field),* }
            }

            pub fn from_array(a: [f64; 3]) -> Self {
                let [$($field),*] = a;
                Self { $($field: <$scalar>::new($field)),* }
            }

            pub fn to_array(self) -> [f64; 3] {
                [$(self.$field.$unit),*]
            }
        }

        impl From<[f64; 3]> for $name {
            fn from(a: [f64; 3]) -> Self {
                Self::from_array(a)
            }
        }

        impl From<$name> for [f64; 3] {
            fn from(v: $name) -> [f64; 3] {
                v.to_array()
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),* }
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),* }
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),* }
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),* }
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self { $($field: self.$field / rhs),* }
            }
        }
    };
}

vector!(
    /// Position in kilometres
    DistanceVector (Distance, km) { x, y, z }
);
vector!(
    /// Velocity in kilometres per second
    VelocityVector (Speed, kmps) { dx, dy, dz }
);
vector!(
    /// Angular velocity in radians per second
    AngularVelocity (AngularRate, radians_per_second) { x, y, z }
);

/// Vector without units, such as a direction or rotation axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DimensionlessVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl DimensionlessVector {
    pub const X_AXIS: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y_AXIS: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z_AXIS: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for DimensionlessVector {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<DimensionlessVector> for [f64; 3] {
    fn from(v: DimensionlessVector) -> [f64; 3] {
        v.to_array()
    }
}

impl Add for DimensionlessVector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for DimensionlessVector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for DimensionlessVector {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for DimensionlessVector {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Distance> for DimensionlessVector {
    type Output = DistanceVector;
    fn mul(self, rhs: Distance) -> DistanceVector {
        DistanceVector::from_array((self * rhs.km).to_array())
    }
}

impl Mul<Speed> for DimensionlessVector {
    type Output = VelocityVector;
    fn mul(self, rhs: Speed) -> VelocityVector {
        VelocityVector::from_array((self * rhs.kmps).to_array())
    }
}

impl Div<EphemerisPeriod> for DistanceVector {
    type Output = VelocityVector;
    fn div(self, rhs: EphemerisPeriod) -> VelocityVector {
        VelocityVector::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Mul<EphemerisPeriod> for VelocityVector {
    type Output = DistanceVector;
    fn mul(self, rhs: EphemerisPeriod) -> DistanceVector {
        DistanceVector::new(self.dx * rhs, self.dy * rhs, self.dz * rhs)
    }
}

/// Position and velocity
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateVector {
    pub r: DistanceVector,
    pub v: VelocityVector,
}

impl StateVector {
    pub fn new(r: DistanceVector, v: VelocityVector) -> Self {
        Self { r, v }
    }

    pub fn from_array(s: [f64; 6]) -> Self {
        Self {
            r: DistanceVector::from_array([s[0], s[1], s[2]]),
            v: VelocityVector::from_array([s[3], s[4], s[5]]),
        }
    }

    pub fn to_array(self) -> [f64; 6] {
        let [x, y, z] = self.r.to_array();
        let [dx, dy, dz] = self.v.to_array();
        [x, y, z, dx, dy, dz]
    }
}

impl Add for StateVector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.v + rhs.v)
    }
}

impl Sub for StateVector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.v - rhs.v)
    }
}

impl Neg for StateVector {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.r, -self.v)
    }
}

/// 3x3 rotation, stored as rows
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationMatrix {
    pub m: [[f64; 3]; 3],
}

impl RotationMatrix {
    pub fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::new(maxq_spicelib::matrices::ident())
    }

    pub fn transpose(&self) -> Self {
        Self::new(maxq_spicelib::matrices::xpose(&self.m))
    }
}

impl Mul for RotationMatrix {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(maxq_spicelib::matrices::mxm(&self.m, &rhs.m))
    }
}

macro_rules! rotate_vector {
    ($($vector:ty),*) => {
        $(
            impl Mul<$vector> for RotationMatrix {
                type Output = $vector;
                fn mul(self, rhs: $vector) -> $vector {
                    <$vector>::from_array(maxq_spicelib::matrices::mxv(&self.m, &rhs.to_array()))
                }
            }
        )*
    };
}

rotate_vector!(DimensionlessVector, DistanceVector, VelocityVector);

impl Mul<StateVector> for RotationMatrix {
    type Output = StateVector;
    fn mul(self, rhs: StateVector) -> StateVector {
        StateVector::new(self * rhs.r, self * rhs.v)
    }
}

/// 6x6 state transformation between rotating frames, stored as rows
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateTransform {
    pub m: [[f64; 6]; 6],
}

impl StateTransform {
    pub fn new(m: [[f64; 6]; 6]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        let mut m = [[0.0; 6]; 6];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self::new(m)
    }

    /// The rotation block
    pub fn rotation(&self) -> RotationMatrix {
        let mut r = [[0.0; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            row.copy_from_slice(&self.m[i][..3]);
        }
        RotationMatrix::new(r)
    }
}

impl Mul for StateTransform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut m = [[0.0; 6]; 6];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, x) in row.iter_mut().enumerate() {
                *x = (0..6).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self::new(m)
    }
}

impl Mul<StateVector> for StateTransform {
    type Output = StateVector;
    fn mul(self, rhs: StateVector) -> StateVector {
        let s = rhs.to_array();
        StateVector::from_array(self.m.map(|row| row.iter().zip(&s).map(|(a, b)| a * b).sum::<f64>()))
    }
}

/// Quaternion in the SPICE convention: `w` is the scalar part
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn from_array([w, x, y, z]: [f64; 4]) -> Self {
        Self { w, x, y, z }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }
}

impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::from_array(maxq_spicelib::rotations::qxq(&self.to_array(), &rhs.to_array()))
    }
}

/// Rotation angles for a three-axis sequence, applied `angle1` first
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerAngles {
    pub angle3: Angle,
    pub angle2: Angle,
    pub angle1: Angle,
}

impl EulerAngles {
    pub fn new(angle3: Angle, angle2: Angle, angle1: Angle) -> Self {
        Self { angle3, angle2, angle1 }
    }
}

/// Euler angles with their rates of change
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerState {
    pub angles: EulerAngles,
    pub rate3: AngularRate,
    pub rate2: AngularRate,
    pub rate1: AngularRate,
}

impl EulerState {
    pub fn from_array(a: [f64; 6]) -> Self {
        Self {
            angles: EulerAngles::new(Angle::new(a[0]), Angle::new(a[1]), Angle::new(a[2])),
            rate3: AngularRate::new(a[3]),
            rate2: AngularRate::new(a[4]),
            rate1: AngularRate::new(a[5]),
        }
    }

    pub fn to_array(self) -> [f64; 6] {
        [
            self.angles.angle3.radians,
            self.angles.angle2.radians,
            self.angles.angle1.radians,
            self.rate3.radians_per_second,
            self.rate2.radians_per_second,
            self.rate1.radians_per_second,
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatitudinalVector {
    pub r: Distance,
    pub lon: Angle,
    pub lat: Angle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphericalVector {
    pub r: Distance,
    pub colat: Angle,
    pub lon: Angle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CylindricalVector {
    pub r: Distance,
    pub lon: Angle,
    pub z: Distance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RaDecVector {
    pub range: Distance,
    pub ra: Angle,
    pub dec: Angle,
}

/// Azimuth and elevation. Their senses are chosen per call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AzElVector {
    pub range: Distance,
    pub az: Angle,
    pub el: Angle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticVector {
    pub lon: Angle,
    pub lat: Angle,
    pub alt: Distance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticVectorRates {
    pub dlon: AngularRate,
    pub dlat: AngularRate,
    pub dalt: Speed,
}

/// Plane `{p : normal · p = constant}`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: DimensionlessVector,
    pub constant: Distance,
}

impl From<maxq_spicelib::planes::Plane> for Plane {
    fn from(p: maxq_spicelib::planes::Plane) -> Self {
        Self {
            normal: p.normal.into(),
            constant: Distance::new(p.constant),
        }
    }
}

impl From<Plane> for maxq_spicelib::planes::Plane {
    fn from(p: Plane) -> Self {
        Self {
            normal: p.normal.into(),
            constant: p.constant.km,
        }
    }
}

/// Ellipse as a centre and orthogonal semi-axis vectors, the major one first
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ellipse {
    pub center: DistanceVector,
    pub semi_major: DistanceVector,
    pub semi_minor: DistanceVector,
}

impl From<maxq_spicelib::ellipses::Ellipse> for Ellipse {
    fn from(e: maxq_spicelib::ellipses::Ellipse) -> Self {
        Self {
            center: e.center.into(),
            semi_major: e.semi_major.into(),
            semi_minor: e.semi_minor.into(),
        }
    }
}

impl From<Ellipse> for maxq_spicelib::ellipses::Ellipse {
    fn from(e: Ellipse) -> Self {
        Self {
            center: e.center.into(),
            semi_major: e.semi_major.into(),
            semi_minor: e.semi_minor.into(),
        }
    }
}

/// Where an ellipse meets a plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EllipsePlaneIntersection {
    None,
    One(DistanceVector),
    Two(DistanceVector, DistanceVector),
    /// Every point of the ellipse lies in the plane
    Coplanar,
}

impl From<maxq_spicelib::ellipses::EllipsePlaneHit> for EllipsePlaneIntersection {
    fn from(hit: maxq_spicelib::ellipses::EllipsePlaneHit) -> Self {
        use maxq_spicelib::ellipses::EllipsePlaneHit;
        match hit {
            EllipsePlaneHit::None => Self::None,
            EllipsePlaneHit::One(p) => Self::One(p.into()),
            EllipsePlaneHit::Two(p1, p2) => Self::Two(p1.into(), p2.into()),
            EllipsePlaneHit::Coplanar => Self::Coplanar,
        }
    }
}

/// Result of a call that either succeeds or fails with a message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResultCode {
    #[default]
    Success,
    Error,
}

/// Result of a search-style call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FoundCode {
    Found,
    #[default]
    NotFound,
}

/// What the toolkit does when an error is signalled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorAction {
    /// Report, then terminate the call. The call returns the signalled
    /// error as its [`Error`](crate::Error) variant and the context stays usable.
    Abort,
    Report,
    #[default]
    Return,
    Ignore,
    /// Same as `Abort`, with an extra hint in the report
    Default,
}

impl ErrorAction {
    pub fn name(self) -> &'static str {
        match self {
            ErrorAction::Abort => "ABORT",
            ErrorAction::Report => "REPORT",
            ErrorAction::Return => "RETURN",
            ErrorAction::Ignore => "IGNORE",
            ErrorAction::Default => "DEFAULT",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match maxq_std::text::normalize_name(name).as_str() {
            "ABORT" => ErrorAction::Abort,
            "REPORT" => ErrorAction::Report,
            "RETURN" => ErrorAction::Return,
            "IGNORE" => ErrorAction::Ignore,
            "DEFAULT" => ErrorAction::Default,
            _ => return None,
        })
    }
}

/// Where error reports are written
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorDevice {
    #[default]
    Screen,
    Null,
    /// Appended to this file
    File(String),
}

impl ErrorDevice {
    pub fn name(&self) -> &str {
        match self {
            ErrorDevice::Screen => "SCREEN",
            ErrorDevice::Null => "NULL",
            ErrorDevice::File(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match maxq_std::text::normalize_name(name).as_str() {
            "SCREEN" => ErrorDevice::Screen,
            "NULL" => ErrorDevice::Null,
            _ => ErrorDevice::File(name.trim().to_owned()),
        }
    }
}

bitflags! {
    /// Parts of an error report that are written to the error device
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ErrorItems: u8 {
        const SHORT = 1 << 0;
        const LONG = 1 << 1;
        const EXPLAIN = 1 << 2;
        const TRACEBACK = 1 << 3;
        const DEFAULT = 1 << 4;
    }
}

const ERROR_ITEM_NAMES: [(ErrorItems, &str); 5] = [
    (ErrorItems::SHORT, "SHORT"),
    (ErrorItems::LONG, "LONG"),
    (ErrorItems::EXPLAIN, "EXPLAIN"),
    (ErrorItems::TRACEBACK, "TRACEBACK"),
    (ErrorItems::DEFAULT, "DEFAULT"),
];

impl ErrorItems {
    /// List in the form taken by `ERRPRT`, e.g. `"SHORT, LONG"` or `"NONE"`
    pub fn to_list(self) -> String {
        if self.is_empty() {
            return "NONE".to_owned();
        }
        ERROR_ITEM_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a list as returned by `ERRPRT GET`
    pub fn from_list(list: &str) -> Self {
        let mut items = ErrorItems::empty();
        for word in list.split([',', ' ']).map(str::trim) {
            if let Some((flag, _)) = ERROR_ITEM_NAMES.iter().find(|(_, n)| n.eq_ignore_ascii_case(word)) {
                items |= *flag;
            }
        }
        items
    }
}

bitflags! {
    /// Kernel categories for `ktotal` and `kdata`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KernelType: u8 {
        const SPK = 1 << 0;
        const CK = 1 << 1;
        const PCK = 1 << 2;
        const DSK = 1 << 3;
        const EK = 1 << 4;
        const TEXT = 1 << 5;
        const META = 1 << 6;
    }
}

impl KernelType {
    /// Kind list in the form taken by `KTOTAL`
    pub fn to_list(self) -> String {
        if self.is_all() {
            return "ALL".to_owned();
        }
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Units accepted by `convrt`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Units {
    Radians,
    Degrees,
    Arcminutes,
    Arcseconds,
    HourAngle,
    MinuteAngle,
    SecondAngle,
    Meters,
    Kilometers,
    Centimeters,
    Millimeters,
    Feet,
    Inches,
    Yards,
    StatuteMiles,
    NauticalMiles,
    Au,
    Parsecs,
    LightSecs,
    LightYears,
    Seconds,
    Minutes,
    Hours,
    Days,
    JulianYears,
    TropicalYears,
    Years,
}

impl Units {
    pub fn name(self) -> &'static str {
        match self {
            Units::Radians => "RADIANS",
            Units::Degrees => "DEGREES",
            Units::Arcminutes => "ARCMINUTES",
            Units::Arcseconds => "ARCSECONDS",
            Units::HourAngle => "HOURANGLE",
            Units::MinuteAngle => "MINUTEANGLE",
            Units::SecondAngle => "SECONDANGLE",
            Units::Meters => "METERS",
            Units::Kilometers => "KILOMETERS",
            Units::Centimeters => "CENTIMETERS",
            Units::Millimeters => "MILLIMETERS",
            Units::Feet => "FEET",
            Units::Inches => "INCHES",
            Units::Yards => "YARDS",
            Units::StatuteMiles => "STATUTE_MILES",
            Units::NauticalMiles => "NAUTICAL_MILES",
            Units::Au => "AU",
            Units::Parsecs => "PARSECS",
            Units::LightSecs => "LIGHTSECS",
            Units::LightYears => "LIGHTYEARS",
            Units::Seconds => "SECONDS",
            Units::Minutes => "MINUTES",
            Units::Hours => "HOURS",
            Units::Days => "DAYS",
            Units::JulianYears => "JULIAN_YEARS",
            Units::TropicalYears => "TROPICAL_YEARS",
            Units::Years => "YEARS",
        }
    }

    pub const ALL: [Units; 27] = [
        Units::Radians,
        Units::Degrees,
        Units::Arcminutes,
        Units::Arcseconds,
        Units::HourAngle,
        Units::MinuteAngle,
        Units::SecondAngle,
        Units::Meters,
        Units::Kilometers,
        Units::Centimeters,
        Units::Millimeters,
        Units::Feet,
        Units::Inches,
        Units::Yards,
        Units::StatuteMiles,
        Units::NauticalMiles,
        Units::Au,
        Units::Parsecs,
        Units::LightSecs,
        Units::LightYears,
        Units::Seconds,
        Units::Minutes,
        Units::Hours,
        Units::Days,
        Units::JulianYears,
        Units::TropicalYears,
        Units::Years,
    ];

    /// The unit with this toolkit name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        let name = maxq_std::text::normalize_name(name);
        Self::ALL.into_iter().find(|u| u.name() == name)
    }
}

/// Uniform time scales accepted by `unitim`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Tai,
    Tdt,
    Tdb,
    Et,
    JulianDateTdt,
    JulianDateTdb,
    JulianEphemerisDate,
}

impl TimeScale {
    pub fn name(self) -> &'static str {
        match self {
            TimeScale::Tai => "TAI",
            TimeScale::Tdt => "TDT",
            TimeScale::Tdb => "TDB",
            TimeScale::Et => "ET",
            TimeScale::JulianDateTdt => "JDTDT",
            TimeScale::JulianDateTdb => "JDTDB",
            TimeScale::JulianEphemerisDate => "JED",
        }
    }
}

/// Output formats of `et2utc`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UtcTimeFormat {
    /// `1986 APR 12 16:31:09.814`
    #[default]
    Calendar,
    /// `1986-102 // 16:31:09.814`
    DayOfYear,
    /// `JD 2446533.1883`
    JulianDate,
    /// `1986-04-12T16:31:09.814`
    IsoCalendar,
    /// `1986-102T16:31:09.814`
    IsoDayOfYear,
}

impl UtcTimeFormat {
    pub fn name(self) -> &'static str {
        match self {
            UtcTimeFormat::Calendar => "C",
            UtcTimeFormat::DayOfYear => "D",
            UtcTimeFormat::JulianDate => "J",
            UtcTimeFormat::IsoCalendar => "ISOC",
            UtcTimeFormat::IsoDayOfYear => "ISOD",
        }
    }
}

/// Time system of the epoch passed to `deltet`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EpochType {
    #[default]
    Utc,
    Et,
}

impl EpochType {
    pub fn name(self) -> &'static str {
        match self {
            EpochType::Utc => "UTC",
            EpochType::Et => "ET",
        }
    }
}

/// Coordinate axis, for rotations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// Toolkit axis number, 1 to 3
    pub fn number(self) -> i32 {
        match self {
            Axis::X => 1,
            Axis::Y => 2,
            Axis::Z => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_zero() {
        assert_eq!(Distance::default().km, 0.0);
        assert_eq!(EphemerisTime::default(), EphemerisTime::J2000);
        assert_eq!(StateVector::default().to_array(), [0.0; 6]);
        assert_eq!(RotationMatrix::default().m, [[0.0; 3]; 3]);
        assert_eq!(Quaternion::default().to_array(), [0.0; 4]);
        assert_eq!(Plane::default().constant, Distance::ZERO);

        let rates = GeodeticVectorRates::default();
        assert_eq!(rates.dlon.radians_per_second, 0.0);
        assert_eq!(rates.dlat.radians_per_second, 0.0);
        assert_eq!(rates.dalt.kmps, 0.0);

        let euler = EulerAngles::default();
        assert_eq!((euler.angle1, euler.angle2, euler.angle3), (Angle::ZERO, Angle::ZERO, Angle::ZERO));
    }

    #[test]
    fn unit_arithmetic() {
        let d = Distance::new(10.0);
        let t = EphemerisPeriod::new(4.0);
        assert_eq!(d / t, Speed::new(2.5));
        assert_eq!(Speed::new(2.5) * t, d);
        assert_eq!(d / Distance::new(5.0), 2.0);
        assert_eq!(2.0 * d, Distance::new(20.0));
        assert_eq!(-d + d, Distance::ZERO);
        assert_eq!(Distance::from_m(1500.0), Distance::new(1.5));

        let et = EphemerisTime::new(100.0);
        assert_eq!(et + t - et, t);
        assert_eq!(EphemerisPeriod::from_days(1.0).seconds, 86400.0);
        assert_relative_eq!(Angle::from_degrees(180.0).radians, std::f64::consts::PI);

        let r = DistanceVector::from_array([4.0, 8.0, 12.0]);
        assert_eq!((r / t).to_array(), [1.0, 2.0, 3.0]);
        assert_eq!((DimensionlessVector::Z_AXIS * Distance::new(3.0)).z, Distance::new(3.0));
        assert_eq!((r - r).to_array(), [0.0; 3]);
    }

    #[test]
    fn rotation_operators() {
        let m = RotationMatrix::new([[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let v = m * DimensionlessVector::X_AXIS;
        assert_eq!(v, DimensionlessVector::new(0.0, -1.0, 0.0));
        assert_eq!(m * m.transpose(), RotationMatrix::identity());
        assert_eq!(Quaternion::identity() * Quaternion::identity(), Quaternion::identity());
    }

    #[test]
    fn state_transform_operators() {
        let mut m = StateTransform::identity().m;
        // Frame spinning about Z at 0.5 rad/s, at the instant it lines up
        m[3][1] = 0.5;
        m[4][0] = -0.5;
        let xform = StateTransform::new(m);
        let s = StateVector::from_array([2.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!((xform * s).to_array(), [2.0, 0.0, 1.0, 0.0, -1.0, 0.0]);
        assert_eq!(StateTransform::identity() * xform, xform);
        assert_eq!(xform.rotation(), RotationMatrix::identity());

        let euler = EulerState::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(euler.angles.angle1, Angle::new(3.0));
        assert_eq!(euler.rate3, AngularRate::new(4.0));
        assert_eq!(euler.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn enum_names() {
        assert_eq!(ErrorItems::empty().to_list(), "NONE");
        assert_eq!((ErrorItems::SHORT | ErrorItems::TRACEBACK).to_list(), "SHORT, TRACEBACK");
        assert_eq!(
            ErrorItems::from_list("SHORT, LONG, EXPLAIN, TRACEBACK, DEFAULT"),
            ErrorItems::all()
        );
        assert_eq!(ErrorItems::from_list("NONE"), ErrorItems::empty());
        assert_eq!(KernelType::all().to_list(), "ALL");
        assert_eq!((KernelType::TEXT | KernelType::META).to_list(), "TEXT META");
        assert_eq!(ErrorAction::parse(" report "), Some(ErrorAction::Report));
        assert_eq!(ErrorDevice::parse("errors.log"), ErrorDevice::File("errors.log".to_owned()));
        assert_eq!(Axis::Y.number(), 2);
        assert_eq!(Units::parse("statute_miles"), Some(Units::StatuteMiles));
        assert_eq!(Units::parse("furlongs"), None);
    }
}
