//! Images: distributions, one-click applications, and user snapshots or backups

use crate::api::{add_options, require_non_empty, require_positive, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const IMAGES_PATH: &str = "/v2/images";

/// A droplet image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub image_type: String,
    #[serde(default)]
    pub distribution: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub min_disk_size: u64,
    #[serde(default)]
    pub size_gigabytes: f64,
    #[serde(rename = "created_at", default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

/// Fields of an image that can be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageUpdateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct ImageRoot {
    image: Image,
}

#[derive(Deserialize)]
struct ImagesRoot {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Serialize)]
struct ImageFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    image_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_name: Option<&'a str>,
}

impl<'a> ImageFilter<'a> {
    fn new(list: &'a ListOptions) -> Self {
        Self {
            list,
            image_type: None,
            private: None,
            tag_name: None,
        }
    }
}

pub struct ImagesService<'a> {
    client: &'a Client,
}

impl<'a> ImagesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        self.list_filtered(&ImageFilter::new(opts)).await
    }

    pub async fn list_distribution(&self, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let filter = ImageFilter {
            image_type: Some("distribution"),
            ..ImageFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    pub async fn list_application(&self, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let filter = ImageFilter {
            image_type: Some("application"),
            ..ImageFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    /// Images owned by the account: snapshots, backups and custom images.
    pub async fn list_user(&self, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let filter = ImageFilter {
            private: Some(true),
            ..ImageFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    pub async fn list_by_tag(&self, tag: &str, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let filter = ImageFilter {
            tag_name: Some(tag),
            ..ImageFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    async fn list_filtered(&self, filter: &ImageFilter<'_>) -> Result<(Vec<Image>, Response)> {
        let path = add_options(IMAGES_PATH, filter)?;
        let (root, resp): (ImagesRoot, _) = self.client.get(&path).await?;
        Ok((root.images, resp))
    }

    pub async fn get(&self, id: u64) -> Result<(Image, Response)> {
        require_positive("imageID", id)?;
        self.get_path(&format!("{}/{}", IMAGES_PATH, id)).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<(Image, Response)> {
        require_non_empty("slug", slug)?;
        self.get_path(&format!("{}/{}", IMAGES_PATH, urlencoding::encode(slug)))
            .await
    }

    async fn get_path(&self, path: &str) -> Result<(Image, Response)> {
        let (root, resp): (ImageRoot, _) = self.client.get(path).await?;
        Ok((root.image, resp))
    }

    pub async fn update(&self, id: u64, update: &ImageUpdateRequest) -> Result<(Image, Response)> {
        require_positive("imageID", id)?;
        let path = format!("{}/{}", IMAGES_PATH, id);
        let (root, resp): (ImageRoot, _) = self.client.put(&path, update).await?;
        Ok((root.image, resp))
    }

    pub async fn delete(&self, id: u64) -> Result<Response> {
        require_positive("imageID", id)?;
        self.client.delete(&format!("{}/{}", IMAGES_PATH, id)).await
    }
}
