//! Valid row range of one search region derived from its stripe labels.

use super::calculator::StripeEvaluation;
use super::positioning::{StripeClip, StripeIndex, StripePositioning};
use super::search::{find_stripe_index, SearchFrom};
use crate::types::Appearance;

/// Appearance and usable rows of one search region.
#[derive(Clone, Debug, PartialEq)]
pub struct RoiValidRange {
    pub appearance: Appearance,
    /// Background stripe touching the material, `-1` unless an edge is visible.
    pub border_background_stripe: StripeIndex,
    /// First material row, `-1` if none.
    pub start_valid_range_y: i32,
    /// Last material row, `-1` if none.
    pub end_valid_range_y: i32,
    /// Stripe layout the indices refer to.
    pub positioning: StripePositioning,
}

impl Default for RoiValidRange {
    fn default() -> Self {
        Self {
            appearance: Appearance::Unknown,
            border_background_stripe: -1,
            start_valid_range_y: -1,
            end_valid_range_y: -1,
            positioning: StripePositioning::empty(0, 0),
        }
    }
}

impl RoiValidRange {
    #[inline]
    pub fn is_edge(&self) -> bool {
        self.appearance.is_edge()
    }

    /// Centre row of the border background stripe, `-1` when there is none.
    pub fn border_stripe_y(&self) -> i32 {
        if self.border_background_stripe < 0 {
            return -1;
        }
        self.positioning
            .stripe_coordinate_in_image(self.border_background_stripe, StripeClip::NoClip)
            .y as i32
    }
}

/// Classify a search region from its stripe labels.
///
/// Material must form one contiguous run of at least `min_stripes_material`
/// stripes touching the top or the bottom of the image; anything else is
/// `Unsupported`.
pub fn update_valid_range(
    stripes: &[StripeEvaluation],
    positioning: &StripePositioning,
    min_stripes_material: usize,
) -> RoiValidRange {
    let mut range = RoiValidRange {
        positioning: positioning.clone(),
        ..RoiValidRange::default()
    };

    let top = find_stripe_index(
        stripes,
        SearchFrom::Top,
        StripeEvaluation::Tube,
        min_stripes_material,
    );
    let bottom = find_stripe_index(
        stripes,
        SearchFrom::Bottom,
        StripeEvaluation::Tube,
        min_stripes_material,
    );
    if top != -1 {
        range.start_valid_range_y =
            positioning.stripe_coordinate_in_image(top, StripeClip::ClipFirst).y as i32;
    }
    if bottom != -1 {
        range.end_valid_range_y =
            positioning.stripe_coordinate_in_image(bottom, StripeClip::ClipLast).y as i32;
    }

    let n = positioning.num_stripes();
    if n == 0 {
        range.appearance = Appearance::NotAvailable;
        return range;
    }

    let material_on_top = top == 0;
    let material_on_bottom = bottom == n - 1;
    if material_on_top && material_on_bottom {
        range.appearance = Appearance::AllMaterial;
        range.end_valid_range_y -= 1;
        return range;
    }
    if top == -1 {
        range.appearance = Appearance::AllBackground;
        return range;
    }

    if !material_on_top {
        let background = find_stripe_index(stripes, SearchFrom::Bottom, StripeEvaluation::NotTube, 0);
        range.appearance = if background == top - 1 && material_on_bottom {
            range.border_background_stripe = background;
            Appearance::BackgroundOnTop
        } else {
            Appearance::Unsupported
        };
        return range;
    }

    let background = find_stripe_index(stripes, SearchFrom::Top, StripeEvaluation::NotTube, 0);
    range.appearance = if background == bottom + 1 {
        range.border_background_stripe = background;
        Appearance::BackgroundOnBottom
    } else {
        Appearance::Unsupported
    };
    range
}
