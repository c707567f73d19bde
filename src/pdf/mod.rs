mod xobject;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::error::Error;
use crate::model::{PageGeometry, SourceBitmap};
use crate::sink::PageSink;

use xobject::embed_bitmap;

struct PageContent {
    content: Content,
    xobjects: Vec<(String, Ref)>,
}

impl PageContent {
    fn new() -> Self {
        Self {
            content: Content::new(),
            xobjects: Vec::new(),
        }
    }
}

/// Page sink writing one PDF document, every page sized by `geometry`.
pub struct PdfSink {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    geometry: PageGeometry,
    pages: Vec<PageContent>,
    image_count: usize,
}

impl PdfSink {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            pdf: Pdf::new(),
            next_id: 3,
            catalog_id: Ref::new(1),
            pages_id: Ref::new(2),
            geometry,
            pages: vec![PageContent::new()],
            image_count: 0,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble page tree, content streams and resources into PDF bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();

        let pages = std::mem::take(&mut self.pages);
        let mut page_xobjects = Vec::with_capacity(n);
        for (i, page) in pages.into_iter().enumerate() {
            let raw = page.content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            self.pdf
                .stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
            page_xobjects.push(page.xobjects);
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(0.0, 0.0, self.geometry.width_pt(), self.geometry.height_pt());
        for (i, xobjects) in page_xobjects.iter().enumerate() {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(self.pages_id)
                .contents(content_ids[i]);
            if !xobjects.is_empty() {
                let mut resources = page.resources();
                let mut dict = resources.x_objects();
                for (name, xobj_ref) in xobjects {
                    dict.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        log::debug!("PDF assembled: {n} page(s), {} image(s)", self.image_count);
        self.pdf.finish()
    }
}

impl PageSink for PdfSink {
    fn new_page(&mut self) -> Result<(), Error> {
        self.pages.push(PageContent::new());
        Ok(())
    }

    fn place(
        &mut self,
        bitmap: &SourceBitmap,
        dest_x: f32,
        dest_y: f32,
        dest_width: f32,
        dest_height: f32,
    ) -> Result<(), Error> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(Error::Configuration(
                "cannot embed an empty bitmap".into(),
            ));
        }
        let xobj_ref = self.alloc();
        embed_bitmap(&mut self.pdf, xobj_ref, bitmap);
        self.image_count += 1;
        let pdf_name = format!("Im{}", self.image_count);

        // PDF space has its origin at the bottom-left, in points
        let k = self.geometry.unit.points_per_unit();
        let w = dest_width * k;
        let h = dest_height * k;
        let x = dest_x * k;
        let y_bottom = self.geometry.height_pt() - (dest_y + dest_height) * k;

        let Some(page) = self.pages.last_mut() else {
            return Err(Error::Configuration("PDF sink has no open page".into()));
        };
        page.content.save_state();
        page.content.transform([w, 0.0, 0.0, h, x, y_bottom]);
        page.content.x_object(Name(pdf_name.as_bytes()));
        page.content.restore_state();
        page.xobjects.push((pdf_name, xobj_ref));
        Ok(())
    }
}
