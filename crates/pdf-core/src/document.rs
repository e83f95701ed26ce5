//! PDF Document builder

use crate::image::{generate_image_operators, ImageXObject};
use crate::{PageSize, PdfError, Result};
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;

/// Document-level metadata written to the trailer's Info dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSS+00'00'`)
    pub fn pdf_date(date: &DateTime<Utc>) -> String {
        date.format("D:%Y%m%d%H%M%S+00'00'").to_string()
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.set(key, text_string(value));
            }
        }
        if let Some(date) = &self.creation_date {
            dict.set("CreationDate", Object::string_literal(Self::pdf_date(date)));
        }
        dict
    }
}

/// Encode a PDF text string
///
/// ASCII is written as a literal. Anything else becomes UTF-16BE with a
/// leading `FE FF` byte order mark, since viewers read BOM-less strings as
/// PDFDocEncoding.
pub(crate) fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// PDF Document builder producing one page tree of uniformly sized pages
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Size applied to every page added
    page_size: PageSize,
    /// Root Pages object
    pages_id: ObjectId,
    /// Page objects in page order
    page_ids: Vec<ObjectId>,
    /// Embedded images (data hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    /// Page image resources (page number -> image name -> object ID)
    page_image_resources: BTreeMap<usize, BTreeMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
    /// Info dictionary object, once written
    info_id: Option<ObjectId>,
}

impl PdfDocument {
    /// Create an empty document whose pages will all have `page_size`
    ///
    /// The document saves as a valid zero-page PDF until pages are added.
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new(PageSize::A4);
    /// assert_eq!(doc.page_count(), 0);
    /// ```
    pub fn new(page_size: PageSize) -> Self {
        let mut inner = Document::with_version("1.4");

        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            page_size,
            pages_id,
            page_ids: Vec::new(),
            embedded_images: HashMap::new(),
            page_image_resources: BTreeMap::new(),
            next_image_resource: 1,
            page_content_buffer: BTreeMap::new(),
            info_id: None,
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Get the size shared by all pages
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Append a blank page
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_page(&mut self) -> Result<usize> {
        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(self.page_size.width as f32),
                Object::Real(self.page_size.height as f32),
            ],
            "Resources" => Dictionary::new(),
        });
        self.page_ids.push(page_id);

        // Keep the page tree's Kids and Count in step with page_ids
        let pages_dict = self
            .inner
            .get_object_mut(self.pages_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::ParseError("Pages object is not a dictionary".to_string()))?;
        pages_dict.set(
            "Kids",
            Object::Array(self.page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        );
        pages_dict.set("Count", self.page_ids.len() as i64);

        Ok(self.page_ids.len())
    }

    /// Draw a JPEG image on a page
    ///
    /// # Arguments
    /// * `data` - JPEG file bytes, embedded without re-encoding
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate of the lower-left corner in points
    /// * `y` - Y coordinate of the lower-left corner in points (from bottom)
    /// * `width` - Drawn width in points
    /// * `height` - Drawn height in points
    pub fn insert_jpeg(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        let image_resource_name = self.get_or_create_image_ref(data, page)?;
        let operators = generate_image_operators(&image_resource_name, x, y, width, height);

        // Buffered until save so each page gets a single content stream
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Set the document Info dictionary, replacing any previous one
    pub fn set_info(&mut self, info: DocumentInfo) {
        let dict = info.to_dictionary();
        match self.info_id {
            Some(id) => {
                self.inner.objects.insert(id, Object::Dictionary(dict));
            }
            None => {
                let id = self.inner.add_object(dict);
                self.inner.trailer.set("Info", id);
                self.info_id = Some(id);
            }
        }
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;

        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Access the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn finalize(&mut self) -> Result<()> {
        self.flush_content_buffers()?;
        self.finalize_page_image_resources()
    }

    /// Get or create an image reference for a specific page
    ///
    /// Returns the resource name (e.g., "Im1", "Im2").
    /// Images are deduplicated by hash of their data.
    fn get_or_create_image_ref(&mut self, data: &[u8], page: usize) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        let object_id = match self.embedded_images.get(&data_hash) {
            Some(id) => *id,
            None => {
                let xobject = ImageXObject::from_jpeg(data).map_err(|e| {
                    PdfError::ImageError(format!("Failed to create image XObject: {e}"))
                })?;
                let id = self.inner.add_object(xobject.to_pdf_stream());
                self.embedded_images.insert(data_hash, id);
                id
            }
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| **id == object_id) {
            return Ok(name.clone());
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        Ok(resource_name)
    }

    /// Write each page's XObject map into its Resources dictionary
    fn finalize_page_image_resources(&mut self) -> Result<()> {
        for (page, images) in &self.page_image_resources {
            let page_id = self.page_id(*page)?;

            let mut xobjects = Dictionary::new();
            for (name, id) in images {
                xobjects.set(name.as_bytes(), Object::Reference(*id));
            }

            let page_dict = self
                .inner
                .get_object_mut(page_id)?
                .as_dict_mut()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;
            page_dict.set(
                "Resources",
                dictionary! {
                    "ProcSet" => vec![Object::Name(b"PDF".to_vec()), Object::Name(b"ImageC".to_vec())],
                    "XObject" => xobjects,
                },
            );
        }
        Ok(())
    }

    /// Buffer content operators for a page
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    ///
    /// Called during save/to_bytes. Each page gets one Flate-compressed
    /// stream appended to whatever it already holds.
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;

        let existing_content = {
            let page_dict = self
                .inner
                .get_object(page_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;
            match page_dict.get(b"Contents") {
                Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                    Ok(Object::Stream(stream)) => stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone()),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            }
        };

        let mut new_content = existing_content;
        new_content.extend_from_slice(content);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&new_content)?;
        let compressed = encoder.finish()?;

        let stream = Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed)
            .with_compression(false);
        let stream_id = self.inner.add_object(stream);

        let page_dict = self
            .inner
            .get_object_mut(page_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;
        page_dict.set("Contents", Object::Reference(stream_id));

        Ok(())
    }

    /// Resolve a 1-indexed page number to its object ID
    fn page_id(&self, page: usize) -> Result<ObjectId> {
        page.checked_sub(1)
            .and_then(|index| self.page_ids.get(index))
            .copied()
            .ok_or(PdfError::InvalidPage(page, self.page_ids.len()))
    }
}
