use embedded_graphics::{
    prelude::{DrawTarget, PixelColor, Point},
    primitives::{Line, PrimitiveStyle, StyledDrawable},
};
use micromath::F32Ext as _;
use nalgebra::Vector3;

use crate::{
    config::VIEW_ANGLES,
    orientation::Orientation,
    rotation::{project, Point3D},
};

/// Segments per sphere ring, one every 15 degrees
pub const RING_SEGMENTS: usize = 24;

/// Horizon markers, North is +X and East is +Y
pub const CARDINALS: [(&str, Vector3<f32>); 4] = [
    ("N", Vector3::new(1.0, 0.0, 0.0)),
    ("S", Vector3::new(-1.0, 0.0, 0.0)),
    ("E", Vector3::new(0.0, 1.0, 0.0)),
    ("W", Vector3::new(0.0, -1.0, 0.0)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Wireframe view of the device orientation: a fixed sphere with horizon
/// markers, the body axes and the measured acceleration.
///
/// Sphere and markers only go through the view rotation. Body axes and the
/// acceleration vector go body -> world (current orientation) first.
pub struct OrientationGizmo {
    center: Point,
    radius: u32,
    view: Orientation,
    orientation: Orientation,
    accel: Option<Vector3<f32>>,
}

impl OrientationGizmo {
    pub fn new(center: Point, radius: u32) -> Self {
        Self {
            center,
            radius,
            view: VIEW_ANGLES,
            orientation: Orientation::ZERO,
            accel: None,
        }
    }

    pub fn with_view(mut self, view: Orientation) -> Self {
        self.view = view;
        self
    }

    pub fn oriented(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Acceleration in g, drawn with 1 g spanning the sphere radius
    pub fn with_accel(mut self, accel: Vector3<f32>) -> Self {
        self.accel = Some(accel);
        self
    }

    fn radius(&self) -> f32 {
        self.radius as f32
    }

    /// World point to screen, truncating towards zero
    fn to_screen(&self, world: Point3D) -> Point {
        let projected = project(world, &self.view);
        self.center + Point::new(projected.x as i32, projected.y as i32)
    }

    fn body_to_screen(&self, body: Point3D) -> Point {
        self.to_screen(self.orientation.rotate(body))
    }

    /// Ring lying in the plane normal to `axis`
    pub fn ring(&self, axis: Axis) -> impl Iterator<Item = Line> + '_ {
        let r = self.radius();
        let vertex = move |step: usize| {
            let (s, c) = (step as f32 * 360.0 / RING_SEGMENTS as f32)
                .to_radians()
                .sin_cos();
            let (c, s) = (c * r, s * r);
            let point = match axis {
                Axis::X => Point3D::new(0.0, c, s),
                Axis::Y => Point3D::new(c, 0.0, s),
                Axis::Z => Point3D::new(c, s, 0.0),
            };
            self.to_screen(point)
        };

        (0..RING_SEGMENTS)
            .map(move |step| Line::new(vertex(step), vertex((step + 1) % RING_SEGMENTS)))
    }

    pub fn sphere(&self) -> impl Iterator<Item = Line> + '_ {
        Axis::ALL.into_iter().flat_map(move |axis| self.ring(axis))
    }

    pub fn cardinals(&self) -> impl Iterator<Item = (&'static str, Point)> + '_ {
        CARDINALS
            .iter()
            .map(move |(label, dir)| (*label, self.to_screen(dir * self.radius())))
    }

    /// Body axis from the sphere center to its tip
    pub fn axis(&self, axis: Axis) -> Line {
        Line::new(
            self.center,
            self.body_to_screen(axis.unit() * self.radius()),
        )
    }

    pub fn axes(&self) -> impl Iterator<Item = (Axis, Line)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self.axis(axis)))
    }

    pub fn accel_vector(&self) -> Option<Line> {
        self.accel
            .map(|accel| Line::new(self.center, self.body_to_screen(accel * self.radius())))
    }
}

impl<C: PixelColor> StyledDrawable<PrimitiveStyle<C>> for OrientationGizmo {
    type Color = C;
    type Output = ();

    fn draw_styled<D>(
        &self,
        style: &PrimitiveStyle<C>,
        target: &mut D,
    ) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.sphere()
            .chain(self.axes().map(|(_, line)| line))
            .chain(self.accel_vector())
            .try_for_each(|line| line.draw_styled(style, target))
    }
}
