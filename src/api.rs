//! Grouped endpoint operations.
//!
//! Each handle borrows the [`Client`] and maps one method to one endpoint.
//! Optional arguments left as `None` are still sent, with an empty value.

use serde_json::Value;

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use crate::upload::FileSource;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            client: &'a Client,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(client: &'a Client) -> Self {
                Self { client }
            }
        }
    };
}

handle!(
    /// `folder/*` endpoints.
    Folder
);
handle!(
    /// `item/*` endpoints.
    Item
);
handle!(
    /// `transfer/*` endpoints.
    Transfer
);
handle!(Account);
handle!(Zip);
handle!(Cache);
handle!(Services);

impl Folder<'_> {
    /// Lists a folder. `None` lists the root.
    pub async fn list(
        &self,
        id: Option<&str>,
        include_breadcrumbs: Option<bool>,
    ) -> Result<Option<Value>> {
        self.client
            .call(
                ApiRequest::get("folder/list")
                    .query("id", id)
                    .query("includebreadcrumbs", include_breadcrumbs),
            )
            .await
    }

    pub async fn create(&self, name: &str, parent_id: Option<&str>) -> Result<Option<Value>> {
        self.client
            .call(
                ApiRequest::post("folder/create")
                    .form("name", name)
                    .form("parent_id", parent_id),
            )
            .await
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("folder/rename").form("id", id).form("name", name))
            .await
    }

    /// Moves `files` and `folders` into folder `id`.
    pub async fn paste(
        &self,
        id: &str,
        files: Option<&[&str]>,
        folders: Option<&[&str]>,
    ) -> Result<Option<Value>> {
        self.client
            .call(
                ApiRequest::post("folder/paste")
                    .form("id", id)
                    .form("files", files)
                    .form("folders", folders),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("folder/delete").form("id", id))
            .await
    }

    pub async fn upload_info(&self, id: Option<&str>) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::get("folder/uploadinfo").query("id", id))
            .await
    }
}

impl Item<'_> {
    pub async fn list_all(&self) -> Result<Option<Value>> {
        self.client.call(ApiRequest::get("item/listall")).await
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("item/rename").form("id", id).form("name", name))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("item/delete").form("id", id))
            .await
    }

    pub async fn details(&self, id: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::get("item/details").query("id", id))
            .await
    }
}

impl Transfer<'_> {
    pub async fn list(&self) -> Result<Option<Value>> {
        self.client.call(ApiRequest::get("transfer/list")).await
    }

    /// Creates a transfer from a URL/magnet (`src`) or an uploaded file.
    ///
    /// A [`FileSource::Path`] is opened here and closed once the request
    /// settles, whichever way it ends.
    pub async fn create(
        &self,
        src: Option<&str>,
        file: Option<FileSource>,
        folder_id: Option<&str>,
    ) -> Result<Option<Value>> {
        let mut request = ApiRequest::post("transfer/create").form("src", src);
        if let Some(file) = file {
            request = request.file("file", file);
        }
        self.client
            .call(request.form("folder_id", folder_id))
            .await
    }

    pub async fn direct_download(&self, src: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("transfer/directdl").form("src", src))
            .await
    }

    pub async fn clear_finished(&self) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("transfer/clearfinished"))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::post("transfer/delete").form("id", id))
            .await
    }
}

impl Account<'_> {
    pub async fn info(&self) -> Result<Option<Value>> {
        self.client.call(ApiRequest::get("account/info")).await
    }
}

impl Zip<'_> {
    /// Requests a zip of the given files and folders.
    pub async fn generate(&self, files: &[&str], folders: &[&str]) -> Result<Option<Value>> {
        self.client
            .call(
                ApiRequest::post("zip/generate")
                    .form("files", files)
                    .form("folders", folders),
            )
            .await
    }
}

impl Cache<'_> {
    /// Checks which of `items` (hashes, links, magnets) are cached.
    pub async fn check(&self, items: &[&str]) -> Result<Option<Value>> {
        self.client
            .call(ApiRequest::get("cache/check").query("items", items))
            .await
    }
}

impl Services<'_> {
    pub async fn list(&self) -> Result<Option<Value>> {
        self.client.call(ApiRequest::get("services/list")).await
    }
}
