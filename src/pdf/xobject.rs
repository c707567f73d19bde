use pdf_writer::{Filter, Pdf, Ref};

use crate::model::SourceBitmap;

/// Write `bitmap` as a Flate-compressed DeviceRGB image XObject.
///
/// Bitmaps reaching a sink have already been flattened onto the page
/// background, so the alpha channel is dropped and no soft mask is written.
pub(super) fn embed_bitmap(pdf: &mut Pdf, xobj_ref: Ref, bitmap: &SourceBitmap) {
    let rgb_data: Vec<u8> = bitmap
        .pixels()
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(bitmap.width() as i32);
    xobj.height(bitmap.height() as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
}
