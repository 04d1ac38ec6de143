#![forbid(unsafe_code)]

//! Composite nodes: horizontal, vertical, and overlay boxes.

use weft_core::Rect;
use weft_render::Screen;

use crate::node::{Element, Node, Requirement};

/// Split `total` cells among children with the given minimums and
/// growth weights.
///
/// Every child receives its minimum first. Remaining slack is split
/// proportionally to the weights; zero-weight children never grow.
/// Integer remainders go to the earlier weighted children, one cell
/// each. When the minimums alone exceed `total`, every child keeps its
/// full minimum and the parent clips.
pub(crate) fn distribute(total: u16, minimums: &[u16], weights: &[u16]) -> Vec<u16> {
    debug_assert_eq!(minimums.len(), weights.len());
    let mut sizes: Vec<u16> = minimums.to_vec();

    let min_sum: u32 = minimums.iter().map(|&m| u32::from(m)).sum();
    let weight_sum: u32 = weights.iter().map(|&w| u32::from(w)).sum();
    let slack = u32::from(total).saturating_sub(min_sum);
    if slack == 0 || weight_sum == 0 {
        return sizes;
    }

    let mut given = 0u32;
    for (size, &weight) in sizes.iter_mut().zip(weights) {
        let share = slack * u32::from(weight) / weight_sum;
        *size = (u32::from(*size) + share).min(u32::from(u16::MAX)) as u16;
        given += share;
    }

    // Truncated shares leave at most weights.len() - 1 cells over.
    let mut remainder = slack - given;
    for (size, &weight) in sizes.iter_mut().zip(weights) {
        if remainder == 0 {
            break;
        }
        if weight > 0 && *size < u16::MAX {
            *size += 1;
            remainder -= 1;
        }
    }

    sizes
}

/// A row of children laid out left to right.
pub struct HBox {
    children: Vec<Element>,
    requirements: Vec<Requirement>,
}

impl HBox {
    pub(crate) fn new(children: Vec<Element>) -> Self {
        let requirements = Vec::with_capacity(children.len());
        Self {
            children,
            requirements,
        }
    }
}

impl Node for HBox {
    fn compute_requirement(&mut self) -> Requirement {
        self.requirements.clear();
        let mut requirement = Requirement::default();
        for child in &mut self.children {
            let r = child.compute_requirement();
            requirement.min_width = requirement.min_width.saturating_add(r.min_width);
            requirement.min_height = requirement.min_height.max(r.min_height);
            requirement.grow_x = requirement.grow_x.saturating_add(r.grow_x);
            requirement.grow_y = requirement.grow_y.max(r.grow_y);
            self.requirements.push(r);
        }
        requirement
    }

    fn set_layout(&mut self, area: Rect) {
        let minimums: Vec<u16> = self.requirements.iter().map(|r| r.min_width).collect();
        let weights: Vec<u16> = self.requirements.iter().map(|r| r.grow_x).collect();
        let widths = distribute(area.width, &minimums, &weights);

        let mut x = area.x;
        for (child, width) in self.children.iter_mut().zip(widths) {
            let slot = Rect::new(x, area.y, width, area.height).intersection(&area);
            child.set_layout(slot);
            x = x.saturating_add(width);
        }
    }

    fn render(&self, screen: &mut Screen) {
        for child in &self.children {
            child.render(screen);
        }
    }
}

/// A column of children laid out top to bottom.
pub struct VBox {
    children: Vec<Element>,
    requirements: Vec<Requirement>,
}

impl VBox {
    pub(crate) fn new(children: Vec<Element>) -> Self {
        let requirements = Vec::with_capacity(children.len());
        Self {
            children,
            requirements,
        }
    }
}

impl Node for VBox {
    fn compute_requirement(&mut self) -> Requirement {
        self.requirements.clear();
        let mut requirement = Requirement::default();
        for child in &mut self.children {
            let r = child.compute_requirement();
            requirement.min_width = requirement.min_width.max(r.min_width);
            requirement.min_height = requirement.min_height.saturating_add(r.min_height);
            requirement.grow_x = requirement.grow_x.max(r.grow_x);
            requirement.grow_y = requirement.grow_y.saturating_add(r.grow_y);
            self.requirements.push(r);
        }
        requirement
    }

    fn set_layout(&mut self, area: Rect) {
        let minimums: Vec<u16> = self.requirements.iter().map(|r| r.min_height).collect();
        let weights: Vec<u16> = self.requirements.iter().map(|r| r.grow_y).collect();
        let heights = distribute(area.height, &minimums, &weights);

        let mut y = area.y;
        for (child, height) in self.children.iter_mut().zip(heights) {
            let slot = Rect::new(area.x, y, area.width, height).intersection(&area);
            child.set_layout(slot);
            y = y.saturating_add(height);
        }
    }

    fn render(&self, screen: &mut Screen) {
        for child in &self.children {
            child.render(screen);
        }
    }
}

/// An overlay: every child fills the box, later children paint over
/// earlier ones.
pub struct DBox {
    children: Vec<Element>,
}

impl DBox {
    pub(crate) fn new(children: Vec<Element>) -> Self {
        Self { children }
    }
}

impl Node for DBox {
    fn compute_requirement(&mut self) -> Requirement {
        let mut requirement = Requirement::default();
        for child in &mut self.children {
            let r = child.compute_requirement();
            requirement.min_width = requirement.min_width.max(r.min_width);
            requirement.min_height = requirement.min_height.max(r.min_height);
            requirement.grow_x = requirement.grow_x.max(r.grow_x);
            requirement.grow_y = requirement.grow_y.max(r.grow_y);
        }
        requirement
    }

    fn set_layout(&mut self, area: Rect) {
        for child in &mut self.children {
            child.set_layout(area);
        }
    }

    fn render(&self, screen: &mut Screen) {
        for child in &self.children {
            child.render(screen);
        }
    }
}
