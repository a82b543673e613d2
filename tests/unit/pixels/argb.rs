use super::*;

#[test]
fn byte_layout_is_aarrggbb() {
    assert_eq!(pack_argb(0x12, 0x34, 0x56, 0x78), 0x1234_5678);
    assert_eq!(unpack_argb(0x1234_5678), [0x12, 0x34, 0x56, 0x78]);
    assert_eq!(alpha(0x80ff_0000), 0x80);
}

#[test]
fn pack_masks_out_of_range_channels() {
    assert_eq!(pack_argb(0x1ff, 0, 0, 0x100), 0xff00_0000);
}

#[test]
fn opaque_sets_alpha_only() {
    assert_eq!(opaque(0x0012_3456), 0xff12_3456);
}
