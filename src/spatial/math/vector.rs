use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

#[derive(Default, Clone, Copy, Debug, Eq, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(C)]
pub struct V3c<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> V3c<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
    pub fn unit(scale: T) -> Self {
        Self {
            x: scale,
            y: scale,
            z: scale,
        }
    }
}

impl<T> AddAssign for V3c<T>
where
    T: Copy + Add<Output = T>,
{
    fn add_assign(&mut self, other: V3c<T>) {
        *self = *self + other;
    }
}

impl<T> V3c<T>
where
    T: num_traits::Signed + Clone,
{
    pub fn abs(&mut self) -> &mut Self {
        self.x = self.x.abs();
        self.y = self.y.abs();
        self.z = self.z.abs();
        self
    }
}

impl V3c<f32> {
    pub fn length(&self) -> f32 {
        ((self.x * self.x) + (self.y * self.y) + (self.z * self.z)).sqrt()
    }

    pub fn normalized(self) -> V3c<f32> {
        self / self.length()
    }

    pub fn min_component(&self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    pub fn max_component(&self) -> f32 {
        self.x.max(self.y).max(self.z)
    }
}

impl<T> V3c<T>
where
    T: Mul<Output = T> + Sub<Output = T> + Copy,
{
    pub fn cross(self, other: V3c<T>) -> V3c<T> {
        V3c {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl<T: Add<Output = T>> Add for V3c<T> {
    type Output = V3c<T>;

    fn add(self, other: V3c<T>) -> V3c<T> {
        V3c {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T> Sub for V3c<T>
where
    T: Copy + Sub<Output = T>,
{
    type Output = V3c<T>;

    fn sub(self, other: V3c<T>) -> V3c<T> {
        V3c {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T: Neg<Output = T>> Neg for V3c<T> {
    type Output = V3c<T>;

    fn neg(self) -> V3c<T> {
        V3c {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for V3c<T> {
    type Output = V3c<T>;

    fn mul(self, scalar: T) -> V3c<T> {
        V3c {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl<T: Mul<Output = T> + Copy> Mul<V3c<T>> for V3c<T> {
    type Output = V3c<T>;

    fn mul(self, other: V3c<T>) -> V3c<T> {
        V3c {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl<T: Div<Output = T> + Copy> Div<T> for V3c<T> {
    type Output = V3c<T>;

    fn div(self, scalar: T) -> V3c<T> {
        V3c {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl<T: Div<Output = T> + Copy> Div<V3c<T>> for V3c<T> {
    type Output = V3c<T>;

    fn div(self, other: V3c<T>) -> V3c<T> {
        V3c {
            x: self.x / other.x,
            y: self.y / other.y,
            z: self.z / other.z,
        }
    }
}

impl From<V3c<f32>> for nalgebra::Point3<f32> {
    fn from(vec: V3c<f32>) -> nalgebra::Point3<f32> {
        nalgebra::Point3::new(vec.x, vec.y, vec.z)
    }
}

impl From<nalgebra::Point3<f32>> for V3c<f32> {
    fn from(point: nalgebra::Point3<f32>) -> V3c<f32> {
        V3c::new(point.x, point.y, point.z)
    }
}

impl From<V3c<f32>> for nalgebra::Vector3<f32> {
    fn from(vec: V3c<f32>) -> nalgebra::Vector3<f32> {
        nalgebra::Vector3::new(vec.x, vec.y, vec.z)
    }
}
